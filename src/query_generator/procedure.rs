//! Procedural blocks for engines that lack a returning clause or `DROP TABLE IF EXISTS`.

use crate::dialect::{DialectCapabilities, GuardedDropStyle};
use crate::escape::escape_string;
use crate::fragments::join_sql_fragments;

pub(crate) const IDENTITY_VARIABLE: &str = "CURRENT_IDENTITY_VALUE_RESULT";

/// `IN <name> <type> => <placeholder>` entry of a `DO (...)` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcedureParameter {
    pub name: String,
    pub sql_type: &'static str,
    /// Canonical bind placeholder (`$sequelize_1`, `$firstName`, `$1`).
    pub placeholder: String,
}

impl ProcedureParameter {
    fn declaration(&self) -> String {
        format!("IN {} {} => {}", self.name, self.sql_type, self.placeholder)
    }
}

/// Wrap `insert_sql` in an anonymous block that selects the new identity value as
/// `primary_key`, cast to INTEGER when it fits in 32 bits and BIGINT otherwise.
///
/// `insert_sql` refers to the parameters as `:name` and must end with `;`.
#[must_use]
pub fn identity_insert_procedure(
    capabilities: &DialectCapabilities,
    insert_sql: &str,
    parameters: &[ProcedureParameter],
    primary_key: &str,
) -> String {
    let header = if parameters.is_empty() {
        "DO".to_string()
    } else {
        let declarations: Vec<String> = parameters
            .iter()
            .map(ProcedureParameter::declaration)
            .collect();
        format!("DO ({})", declarations.join(", "))
    };
    let alias = crate::escape::quote_identifier(capabilities, primary_key);
    let value = format!(":{IDENTITY_VARIABLE}");

    join_sql_fragments([
        header,
        "BEGIN".to_string(),
        format!("DECLARE {IDENTITY_VARIABLE} BIGINT;"),
        insert_sql.to_string(),
        format!("SELECT CURRENT_IDENTITY_VALUE() INTO {IDENTITY_VARIABLE} FROM DUMMY;"),
        format!("IF {} <= {value} AND {value} <= {} THEN", i32::MIN, i32::MAX),
        format!("SELECT TO_INTEGER({value}) as {alias} FROM DUMMY;"),
        "ELSE".to_string(),
        format!("SELECT TO_BIGINT({value}) as {alias} FROM DUMMY;"),
        "END IF;".to_string(),
        "END;".to_string(),
    ])
}

/// Run `drop_sql` only when the catalog lists the table.
///
/// `table_name` and `schema` are already-escaped string literals (or the current-schema
/// expression).
#[must_use]
pub fn guarded_drop_block(
    capabilities: &DialectCapabilities,
    style: GuardedDropStyle,
    drop_sql: &str,
    table_name: &str,
    schema: &str,
) -> String {
    let statement = escape_string(capabilities, drop_sql);
    match style {
        GuardedDropStyle::Hana => join_sql_fragments([
            "DO BEGIN".to_string(),
            "DECLARE table_count INTEGER;".to_string(),
            "SELECT COUNT(*) INTO table_count FROM TABLES".to_string(),
            format!("WHERE TABLE_NAME = {table_name} AND SCHEMA_NAME = {schema};"),
            "IF :table_count > 0 THEN".to_string(),
            format!("EXEC {statement};"),
            "END IF;".to_string(),
            "END;".to_string(),
        ]),
        GuardedDropStyle::Db2 => join_sql_fragments([
            "BEGIN".to_string(),
            "DECLARE table_count INTEGER;".to_string(),
            "SELECT COUNT(*) INTO table_count FROM SYSCAT.TABLES".to_string(),
            format!("WHERE TABNAME = {table_name} AND TABSCHEMA = {schema};"),
            "IF table_count > 0 THEN".to_string(),
            format!("EXECUTE IMMEDIATE {statement};"),
            "END IF;".to_string(),
            "END".to_string(),
        ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DialectKind;

    fn hana() -> &'static DialectCapabilities {
        DialectCapabilities::preset(DialectKind::Hana)
    }

    #[test]
    fn identity_block_branches_on_the_32_bit_range() {
        let sql = identity_insert_procedure(
            hana(),
            "INSERT INTO \"Users\" (\"firstName\") VALUES (:firstName);",
            &[ProcedureParameter {
                name: "firstName".into(),
                sql_type: "NVARCHAR(5000)",
                placeholder: "$sequelize_1".into(),
            }],
            "id",
        );
        assert_eq!(
            sql,
            "DO (IN firstName NVARCHAR(5000) => $sequelize_1) BEGIN \
             DECLARE CURRENT_IDENTITY_VALUE_RESULT BIGINT; \
             INSERT INTO \"Users\" (\"firstName\") VALUES (:firstName); \
             SELECT CURRENT_IDENTITY_VALUE() INTO CURRENT_IDENTITY_VALUE_RESULT FROM DUMMY; \
             IF -2147483648 <= :CURRENT_IDENTITY_VALUE_RESULT AND :CURRENT_IDENTITY_VALUE_RESULT <= 2147483647 THEN \
             SELECT TO_INTEGER(:CURRENT_IDENTITY_VALUE_RESULT) as \"id\" FROM DUMMY; \
             ELSE SELECT TO_BIGINT(:CURRENT_IDENTITY_VALUE_RESULT) as \"id\" FROM DUMMY; \
             END IF; END;"
        );
    }

    #[test]
    fn identity_block_without_parameters_has_no_header_list() {
        let sql = identity_insert_procedure(hana(), "INSERT INTO \"T\" VALUES (now());", &[], "Key\"Id");
        assert!(sql.starts_with("DO BEGIN DECLARE"));
        assert!(sql.contains("as \"Key\"\"Id\" FROM DUMMY"));
    }

    #[test]
    fn guarded_drop_escapes_the_inner_statement() {
        let sql = guarded_drop_block(
            hana(),
            GuardedDropStyle::Hana,
            "DROP TABLE \"it's\"",
            "'it''s'",
            "CURRENT_SCHEMA",
        );
        assert_eq!(
            sql,
            "DO BEGIN DECLARE table_count INTEGER; SELECT COUNT(*) INTO table_count FROM TABLES \
             WHERE TABLE_NAME = 'it''s' AND SCHEMA_NAME = CURRENT_SCHEMA; \
             IF :table_count > 0 THEN EXEC 'DROP TABLE \"it''s\"'; END IF; END;"
        );
    }

    #[test]
    fn db2_guard_uses_execute_immediate() {
        let db2 = DialectCapabilities::preset(DialectKind::Db2);
        let sql = guarded_drop_block(
            db2,
            GuardedDropStyle::Db2,
            "DROP TABLE \"Users\"",
            "'Users'",
            "CURRENT SCHEMA",
        );
        assert!(sql.starts_with("BEGIN DECLARE table_count INTEGER;"));
        assert!(sql.contains("EXECUTE IMMEDIATE 'DROP TABLE \"Users\"'; END IF; END"));
    }
}
