use lazy_static::lazy_static;

use crate::translation::PlaceholderStyle;
use crate::types::DialectKind;

use super::{
    BeginStyle, DialectCapabilities, DropSchemaSupport, DropTableSupport, EmptyInsertStyle,
    GuardedDropStyle, IgnoreDuplicatesStyle, JsonExtractionStyle, RemoveIndexSupport,
    ReturningStyle, SavepointStyle, TransactionSyntax,
};

lazy_static! {
    static ref POSTGRES: DialectCapabilities = postgres();
    static ref SQLITE: DialectCapabilities = sqlite();
    static ref MSSQL: DialectCapabilities = mssql();
    static ref MYSQL: DialectCapabilities = mysql();
    static ref DB2: DialectCapabilities = db2();
    static ref HANA: DialectCapabilities = hana();
}

pub(super) fn preset(kind: DialectKind) -> &'static DialectCapabilities {
    match kind {
        DialectKind::Postgres => &*POSTGRES,
        DialectKind::Sqlite => &*SQLITE,
        DialectKind::Mssql => &*MSSQL,
        DialectKind::Mysql => &*MYSQL,
        DialectKind::Db2 => &*DB2,
        DialectKind::Hana => &*HANA,
    }
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}

const STANDARD_TX: TransactionSyntax = TransactionSyntax {
    begin: BeginStyle::StartTransaction,
    savepoint: SavepointStyle::Standard,
    commit: "COMMIT;",
    rollback: "ROLLBACK;",
    read_only: false,
    isolation_level: false,
    transaction_type: false,
};

fn postgres() -> DialectCapabilities {
    DialectCapabilities {
        kind: DialectKind::Postgres,
        identifier_quotes: ('"', '"'),
        placeholder_style: PlaceholderStyle::Numbered,
        returning: ReturningStyle::Returning,
        supports_schemas: true,
        default_schema: Some("public"),
        technical_schemas: owned(&["information_schema", "tiger", "tiger_data", "topology"]),
        current_schema: "current_schema()",
        boolean_literals: ("true", "false"),
        backslash_escapes: false,
        empty_insert: EmptyInsertStyle::DefaultValues,
        ignore_duplicates: Some(IgnoreDuplicatesStyle::OnConflictDoNothing),
        json_extraction: JsonExtractionStyle::PathOperators,
        drop_table: DropTableSupport {
            cascade: true,
            if_exists: true,
            guarded: None,
        },
        drop_schema: DropSchemaSupport {
            supported: true,
            cascade: true,
            if_exists: true,
            restrict_keyword: false,
        },
        remove_index: RemoveIndexSupport {
            if_exists: true,
            cascade: true,
            concurrently: true,
            on_table: false,
            schema_qualified: true,
        },
        transactions: TransactionSyntax {
            read_only: true,
            isolation_level: true,
            ..STANDARD_TX
        },
    }
}

fn sqlite() -> DialectCapabilities {
    DialectCapabilities {
        kind: DialectKind::Sqlite,
        identifier_quotes: ('`', '`'),
        placeholder_style: PlaceholderStyle::DollarNamed,
        returning: ReturningStyle::Returning,
        supports_schemas: false,
        default_schema: None,
        technical_schemas: Vec::new(),
        current_schema: "'main'",
        boolean_literals: ("1", "0"),
        backslash_escapes: false,
        empty_insert: EmptyInsertStyle::DefaultValues,
        ignore_duplicates: Some(IgnoreDuplicatesStyle::InsertOrIgnore),
        json_extraction: JsonExtractionStyle::ArrowJsonPath,
        drop_table: DropTableSupport {
            cascade: false,
            if_exists: true,
            guarded: None,
        },
        drop_schema: DropSchemaSupport::default(),
        remove_index: RemoveIndexSupport {
            if_exists: true,
            ..RemoveIndexSupport::default()
        },
        transactions: TransactionSyntax {
            begin: BeginStyle::Begin,
            transaction_type: true,
            ..STANDARD_TX
        },
    }
}

fn mssql() -> DialectCapabilities {
    DialectCapabilities {
        kind: DialectKind::Mssql,
        identifier_quotes: ('[', ']'),
        placeholder_style: PlaceholderStyle::AtNamed,
        returning: ReturningStyle::OutputInserted,
        supports_schemas: true,
        default_schema: Some("dbo"),
        technical_schemas: owned(&[
            "db_accessadmin",
            "db_backupoperator",
            "db_datareader",
            "db_datawriter",
            "db_ddladmin",
            "db_denydatareader",
            "db_denydatawriter",
            "db_owner",
            "db_securityadmin",
            "guest",
            "INFORMATION_SCHEMA",
            "sys",
        ]),
        current_schema: "SCHEMA_NAME()",
        boolean_literals: ("1", "0"),
        backslash_escapes: false,
        empty_insert: EmptyInsertStyle::DefaultValues,
        ignore_duplicates: None,
        json_extraction: JsonExtractionStyle::SqlStandard,
        drop_table: DropTableSupport {
            cascade: false,
            if_exists: true,
            guarded: None,
        },
        drop_schema: DropSchemaSupport {
            supported: true,
            cascade: false,
            if_exists: true,
            restrict_keyword: false,
        },
        remove_index: RemoveIndexSupport {
            if_exists: true,
            on_table: true,
            ..RemoveIndexSupport::default()
        },
        transactions: TransactionSyntax {
            begin: BeginStyle::BeginTransaction,
            savepoint: SavepointStyle::SqlServer,
            commit: "COMMIT TRANSACTION;",
            rollback: "ROLLBACK TRANSACTION;",
            ..STANDARD_TX
        },
    }
}

fn mysql() -> DialectCapabilities {
    DialectCapabilities {
        kind: DialectKind::Mysql,
        identifier_quotes: ('`', '`'),
        placeholder_style: PlaceholderStyle::Question,
        returning: ReturningStyle::LastInsertId,
        supports_schemas: true,
        default_schema: None,
        technical_schemas: owned(&[
            "MYSQL",
            "INFORMATION_SCHEMA",
            "PERFORMANCE_SCHEMA",
            "SYS",
            "mysql",
            "information_schema",
            "performance_schema",
            "sys",
        ]),
        current_schema: "DATABASE()",
        boolean_literals: ("true", "false"),
        backslash_escapes: true,
        empty_insert: EmptyInsertStyle::EmptyColumnList,
        ignore_duplicates: Some(IgnoreDuplicatesStyle::InsertIgnore),
        json_extraction: JsonExtractionStyle::ExtractFunction,
        drop_table: DropTableSupport {
            cascade: false,
            if_exists: true,
            guarded: None,
        },
        drop_schema: DropSchemaSupport {
            supported: true,
            cascade: false,
            if_exists: true,
            restrict_keyword: false,
        },
        remove_index: RemoveIndexSupport {
            on_table: true,
            ..RemoveIndexSupport::default()
        },
        transactions: TransactionSyntax {
            read_only: true,
            ..STANDARD_TX
        },
    }
}

fn db2() -> DialectCapabilities {
    DialectCapabilities {
        kind: DialectKind::Db2,
        identifier_quotes: ('"', '"'),
        placeholder_style: PlaceholderStyle::Question,
        returning: ReturningStyle::FinalTable,
        supports_schemas: true,
        default_schema: None,
        technical_schemas: owned(&["ERRORSCHEMA", "NULLID", "SQLJ"]),
        current_schema: "CURRENT SCHEMA",
        boolean_literals: ("true", "false"),
        backslash_escapes: false,
        empty_insert: EmptyInsertStyle::Unsupported,
        ignore_duplicates: None,
        json_extraction: JsonExtractionStyle::SqlStandard,
        drop_table: DropTableSupport {
            cascade: false,
            if_exists: false,
            guarded: Some(GuardedDropStyle::Db2),
        },
        drop_schema: DropSchemaSupport {
            supported: true,
            cascade: false,
            if_exists: false,
            restrict_keyword: true,
        },
        remove_index: RemoveIndexSupport::default(),
        transactions: TransactionSyntax {
            begin: BeginStyle::Implicit,
            savepoint: SavepointStyle::Db2,
            ..STANDARD_TX
        },
    }
}

fn hana() -> DialectCapabilities {
    DialectCapabilities {
        kind: DialectKind::Hana,
        identifier_quotes: ('"', '"'),
        placeholder_style: PlaceholderStyle::Question,
        returning: ReturningStyle::IdentityProcedure,
        supports_schemas: true,
        default_schema: None,
        technical_schemas: owned(&["SYSTEM", "UIS", "HANA_XS_BASE"]),
        current_schema: "CURRENT_SCHEMA",
        boolean_literals: ("TRUE", "FALSE"),
        backslash_escapes: false,
        empty_insert: EmptyInsertStyle::Unsupported,
        ignore_duplicates: None,
        json_extraction: JsonExtractionStyle::SqlStandard,
        drop_table: DropTableSupport {
            cascade: true,
            if_exists: false,
            guarded: Some(GuardedDropStyle::Hana),
        },
        drop_schema: DropSchemaSupport {
            supported: true,
            cascade: true,
            if_exists: false,
            restrict_keyword: false,
        },
        remove_index: RemoveIndexSupport::default(),
        transactions: TransactionSyntax {
            begin: BeginStyle::Implicit,
            ..STANDARD_TX
        },
    }
}
