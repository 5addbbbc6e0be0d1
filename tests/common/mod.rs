#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sql_dialect::prelude::*;
use sql_dialect::CollaboratorError;

/// Everything the fakes observed, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Execute(SqlRequest),
    AutoCommit(bool),
}

pub type EventLog = Arc<Mutex<Vec<Event>>>;

pub fn new_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn events(log: &EventLog) -> Vec<Event> {
    log.lock().unwrap().clone()
}

pub fn statements(log: &EventLog) -> Vec<String> {
    events(log)
        .into_iter()
        .filter_map(|event| match event {
            Event::Execute(request) => Some(request.sql),
            Event::AutoCommit(_) => None,
        })
        .collect()
}

pub fn requests(log: &EventLog) -> Vec<SqlRequest> {
    events(log)
        .into_iter()
        .filter_map(|event| match event {
            Event::Execute(request) => Some(request),
            Event::AutoCommit(_) => None,
        })
        .collect()
}

/// Execution collaborator that records every request and replays canned results.
pub struct RecordingExecutor {
    log: EventLog,
    responses: VecDeque<ResultSet>,
    fail_on: Option<String>,
}

impl RecordingExecutor {
    pub fn new(log: &EventLog) -> Self {
        Self {
            log: Arc::clone(log),
            responses: VecDeque::new(),
            fail_on: None,
        }
    }

    pub fn respond_with(mut self, rows: ResultSet) -> Self {
        self.responses.push_back(rows);
        self
    }

    /// Fail any statement containing `fragment`.
    pub fn failing_on(mut self, fragment: &str) -> Self {
        self.fail_on = Some(fragment.to_string());
        self
    }
}

#[async_trait]
impl SqlExecutor for RecordingExecutor {
    async fn execute(&mut self, request: SqlRequest) -> Result<ResultSet, CollaboratorError> {
        let fails = self
            .fail_on
            .as_deref()
            .is_some_and(|fragment| request.sql.contains(fragment));
        self.log.lock().unwrap().push(Event::Execute(request));
        if fails {
            return Err(Box::new(std::io::Error::other("connection reset by peer")));
        }
        Ok(self.responses.pop_front().unwrap_or_default())
    }
}

/// Connection collaborator that records autocommit toggles.
pub struct RecordingConnection {
    log: EventLog,
    auto_commit: bool,
}

impl TransactionConnection for RecordingConnection {
    fn set_auto_commit(&mut self, enabled: bool) -> Result<(), CollaboratorError> {
        self.auto_commit = enabled;
        self.log.lock().unwrap().push(Event::AutoCommit(enabled));
        Ok(())
    }

    fn auto_commit(&self) -> bool {
        self.auto_commit
    }
}

pub fn connection(log: &EventLog) -> SharedConnection {
    Arc::new(Mutex::new(RecordingConnection {
        log: Arc::clone(log),
        auto_commit: true,
    }))
}

pub fn rows(columns: &[&str], values: Vec<Vec<BindValue>>) -> ResultSet {
    let mut set = ResultSet::with_capacity(values.len());
    set.set_column_names(Arc::new(columns.iter().map(|c| (*c).to_string()).collect()));
    for row in values {
        set.add_row_values(row);
    }
    set
}

pub fn interface(kind: DialectKind, executor: RecordingExecutor) -> QueryInterface<RecordingExecutor> {
    QueryInterface::new(QueryGenerator::for_dialect(kind), executor)
}
