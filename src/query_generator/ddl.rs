use crate::error::SqlDialectError;
use crate::fragments::SqlFragments;
use crate::table::TableReference;
use crate::types::DialectKind;

use super::QueryGenerator;
use super::naming::generate_index_name;
use super::options::{
    AddIndexOptions, DropSchemaOptions, DropTableOptions, IndexTarget, RemoveIndexOptions,
    reject_invalid_options,
};
use super::procedure::guarded_drop_block;

impl QueryGenerator {
    /// Drop `table` if it exists.
    ///
    /// Engines without `DROP TABLE IF EXISTS` get a procedural block that checks the catalog
    /// first and only then executes the drop.
    ///
    /// # Errors
    /// [`SqlDialectError::UnsupportedOption`] when `cascade` is set on an engine that cannot
    /// cascade.
    pub fn drop_table_query(
        &self,
        table: &TableReference,
        options: DropTableOptions,
    ) -> Result<String, SqlDialectError> {
        let caps = self.capabilities();
        reject_invalid_options(
            "dropTableQuery",
            caps,
            DropTableOptions::SUPPORTABLE,
            &DropTableOptions::supported(caps),
            &options.provided(),
        )?;

        let support = caps.drop_table;
        let sql = if support.if_exists {
            SqlFragments::new()
                .push("DROP TABLE IF EXISTS")
                .push(self.quote_table(table))
                .push_if(options.cascade, "CASCADE")
                .push(";")
                .join()
        } else {
            let drop_sql = SqlFragments::new()
                .push("DROP TABLE")
                .push(self.quote_table(table))
                .push_if(options.cascade, "CASCADE")
                .join();
            match support.guarded {
                Some(style) => guarded_drop_block(
                    caps,
                    style,
                    &drop_sql,
                    &self.escape(table.table_name()),
                    &self.schema_or_current(table.schema()),
                ),
                None => format!("{drop_sql};"),
            }
        };
        Ok(self.emit("dropTableQuery", sql))
    }

    /// # Errors
    /// [`SqlDialectError::Unimplemented`] on engines without schemas,
    /// [`SqlDialectError::UnsupportedOption`] for `cascade` where it is not available.
    pub fn drop_schema_query(
        &self,
        schema: &str,
        options: DropSchemaOptions,
    ) -> Result<String, SqlDialectError> {
        let caps = self.capabilities();
        let support = caps.drop_schema;
        if !support.supported {
            return Err(SqlDialectError::Unimplemented(format!(
                "dropSchemaQuery on {}",
                caps.name()
            )));
        }
        reject_invalid_options(
            "dropSchemaQuery",
            caps,
            DropSchemaOptions::SUPPORTABLE,
            &DropSchemaOptions::supported(caps),
            &options.provided(),
        )?;

        let behaviour = if options.cascade {
            Some("CASCADE")
        } else if support.restrict_keyword {
            Some("RESTRICT")
        } else {
            None
        };
        let sql = SqlFragments::new()
            .push("DROP SCHEMA")
            .push_if(support.if_exists, "IF EXISTS")
            .push(self.quote_identifier(schema))
            .push_opt(behaviour)
            .push(";")
            .join();
        Ok(self.emit("dropSchemaQuery", sql))
    }

    /// `CREATE [UNIQUE] INDEX` over `columns`. Unnamed indexes get the same derived name
    /// [`remove_index_query`](Self::remove_index_query) computes from the column list.
    ///
    /// # Errors
    /// [`SqlDialectError::InvalidIdentifier`] when `columns` is empty.
    pub fn add_index_query<S: AsRef<str>>(
        &self,
        table: &TableReference,
        columns: &[S],
        options: &AddIndexOptions,
    ) -> Result<String, SqlDialectError> {
        if columns.is_empty() {
            return Err(SqlDialectError::InvalidIdentifier(format!(
                "index on {} needs at least one column",
                table.table_name()
            )));
        }

        let name = options
            .name
            .clone()
            .unwrap_or_else(|| generate_index_name(table, columns, options.unique));
        let column_list: Vec<String> = columns
            .iter()
            .map(|column| self.quote_identifier(column.as_ref()))
            .collect();

        let sql = SqlFragments::new()
            .push(if options.unique {
                "CREATE UNIQUE INDEX"
            } else {
                "CREATE INDEX"
            })
            .push(self.quote_identifier(&name))
            .push("ON")
            .push(self.quote_table(table))
            .push(format!("({});", column_list.join(", ")))
            .join();
        Ok(self.emit("addIndexQuery", sql))
    }

    /// Drop an index by name, or by the columns it was created over.
    ///
    /// # Errors
    /// [`SqlDialectError::UnsupportedOption`] naming every option the engine lacks.
    pub fn remove_index_query(
        &self,
        table: &TableReference,
        target: &IndexTarget,
        options: RemoveIndexOptions,
    ) -> Result<String, SqlDialectError> {
        let caps = self.capabilities();
        reject_invalid_options(
            "removeIndexQuery",
            caps,
            RemoveIndexOptions::SUPPORTABLE,
            &RemoveIndexOptions::supported(caps),
            &options.provided(),
        )?;

        let index_name = match target {
            IndexTarget::Name(name) => name.clone(),
            IndexTarget::Columns(columns) => generate_index_name(table, columns, false),
            IndexTarget::UniqueColumns(columns) => generate_index_name(table, columns, true),
        };

        let support = caps.remove_index;
        let quoted_index = match table.schema() {
            Some(schema) if support.schema_qualified => format!(
                "{}.{}",
                self.quote_identifier(schema),
                self.quote_identifier(&index_name)
            ),
            _ => self.quote_identifier(&index_name),
        };

        let sql = SqlFragments::new()
            .push("DROP INDEX")
            .push_if(options.concurrently, "CONCURRENTLY")
            .push_if(options.if_exists, "IF EXISTS")
            .push(quoted_index)
            .push_opt(
                support
                    .on_table
                    .then(|| format!("ON {}", self.quote_table(table))),
            )
            .push_if(options.cascade, "CASCADE")
            .push(";")
            .join();
        Ok(self.emit("removeIndexQuery", sql))
    }

    /// Enable or disable foreign-key enforcement for the session.
    ///
    /// # Errors
    /// [`SqlDialectError::Unimplemented`] on engines without a session-level switch.
    pub fn toggle_foreign_key_checks_query(&self, enable: bool) -> Result<String, SqlDialectError> {
        let sql = match self.dialect() {
            DialectKind::Mysql => format!("SET FOREIGN_KEY_CHECKS={};", u8::from(enable)),
            DialectKind::Sqlite => format!(
                "PRAGMA foreign_keys = {};",
                if enable { "ON" } else { "OFF" }
            ),
            other => {
                return Err(SqlDialectError::Unimplemented(format!(
                    "toggleForeignKeyChecksQuery on {other}"
                )));
            }
        };
        Ok(self.emit("toggleForeignKeyChecksQuery", sql))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(name: &str) -> TableReference {
        TableReference::parse(name).unwrap()
    }

    #[test]
    fn drop_table_uses_if_exists_where_available() {
        let postgres = QueryGenerator::for_dialect(DialectKind::Postgres);
        assert_eq!(
            postgres
                .drop_table_query(&table("public.Users"), DropTableOptions { cascade: true })
                .unwrap(),
            "DROP TABLE IF EXISTS \"public\".\"Users\" CASCADE;"
        );
        let mssql = QueryGenerator::for_dialect(DialectKind::Mssql);
        assert_eq!(
            mssql
                .drop_table_query(&table("Users"), DropTableOptions::default())
                .unwrap(),
            "DROP TABLE IF EXISTS [Users];"
        );
    }

    #[test]
    fn cascade_is_rejected_before_any_sql() {
        let sqlite = QueryGenerator::for_dialect(DialectKind::Sqlite);
        let err = sqlite
            .drop_table_query(&table("Users"), DropTableOptions { cascade: true })
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "dropTableQuery was called with options that sqlite does not support: cascade"
        );
    }

    #[test]
    fn hana_drop_is_guarded_by_a_catalog_count() {
        let hana = QueryGenerator::for_dialect(DialectKind::Hana);
        let sql = hana
            .drop_table_query(&table("Users"), DropTableOptions { cascade: true })
            .unwrap();
        assert_eq!(
            sql,
            "DO BEGIN DECLARE table_count INTEGER; SELECT COUNT(*) INTO table_count FROM TABLES \
             WHERE TABLE_NAME = 'Users' AND SCHEMA_NAME = CURRENT_SCHEMA; \
             IF :table_count > 0 THEN EXEC 'DROP TABLE \"Users\" CASCADE'; END IF; END;"
        );
    }

    #[test]
    fn db2_drop_is_guarded_with_execute_immediate() {
        let db2 = QueryGenerator::for_dialect(DialectKind::Db2);
        let sql = db2
            .drop_table_query(&table("APP.Users"), DropTableOptions::default())
            .unwrap();
        assert!(sql.starts_with("BEGIN DECLARE table_count INTEGER;"), "{sql}");
        assert!(sql.contains("WHERE TABNAME = 'Users' AND TABSCHEMA = 'APP';"), "{sql}");
        assert!(sql.contains("EXECUTE IMMEDIATE 'DROP TABLE \"APP\".\"Users\"';"), "{sql}");
    }

    #[test]
    fn drop_schema_forms() {
        let postgres = QueryGenerator::for_dialect(DialectKind::Postgres);
        assert_eq!(
            postgres
                .drop_schema_query("audit", DropSchemaOptions { cascade: true })
                .unwrap(),
            "DROP SCHEMA IF EXISTS \"audit\" CASCADE;"
        );
        let db2 = QueryGenerator::for_dialect(DialectKind::Db2);
        assert_eq!(
            db2.drop_schema_query("AUDIT", DropSchemaOptions::default())
                .unwrap(),
            "DROP SCHEMA \"AUDIT\" RESTRICT;"
        );
        let sqlite = QueryGenerator::for_dialect(DialectKind::Sqlite);
        assert!(matches!(
            sqlite.drop_schema_query("main", DropSchemaOptions::default()),
            Err(SqlDialectError::Unimplemented(_))
        ));
    }

    #[test]
    fn removing_by_columns_matches_the_created_name() {
        let mysql = QueryGenerator::for_dialect(DialectKind::Mysql);
        let users = table("Users");
        let created = mysql
            .add_index_query(&users, &["firstName", "lastName"], &AddIndexOptions::default())
            .unwrap();
        assert_eq!(
            created,
            "CREATE INDEX `users_first_name_last_name` ON `Users` (`firstName`, `lastName`);"
        );
        let removed = mysql
            .remove_index_query(
                &users,
                &IndexTarget::columns(["firstName", "lastName"]),
                RemoveIndexOptions::default(),
            )
            .unwrap();
        assert_eq!(removed, "DROP INDEX `users_first_name_last_name` ON `Users`;");
    }

    #[test]
    fn postgres_index_removal_is_schema_qualified() {
        let postgres = QueryGenerator::for_dialect(DialectKind::Postgres);
        let sql = postgres
            .remove_index_query(
                &table("app.Users"),
                &IndexTarget::from("users_email"),
                RemoveIndexOptions {
                    if_exists: true,
                    cascade: true,
                    concurrently: true,
                },
            )
            .unwrap();
        assert_eq!(
            sql,
            "DROP INDEX CONCURRENTLY IF EXISTS \"app\".\"users_email\" CASCADE;"
        );
    }

    #[test]
    fn hana_index_removal_accepts_no_options() {
        let hana = QueryGenerator::for_dialect(DialectKind::Hana);
        let users = table("Users");
        assert_eq!(
            hana.remove_index_query(
                &users,
                &IndexTarget::UniqueColumns(vec!["email".into()]),
                RemoveIndexOptions::default()
            )
            .unwrap(),
            "DROP INDEX \"users_email_unique\";"
        );
        assert!(
            hana.remove_index_query(
                &users,
                &IndexTarget::from("x"),
                RemoveIndexOptions {
                    concurrently: true,
                    ..RemoveIndexOptions::default()
                }
            )
            .is_err()
        );
    }

    #[test]
    fn index_needs_columns() {
        let sqlite = QueryGenerator::for_dialect(DialectKind::Sqlite);
        let none: [&str; 0] = [];
        assert!(matches!(
            sqlite.add_index_query(&table("Users"), &none, &AddIndexOptions::default()),
            Err(SqlDialectError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn foreign_key_toggle() {
        let mysql = QueryGenerator::for_dialect(DialectKind::Mysql);
        assert_eq!(
            mysql.toggle_foreign_key_checks_query(false).unwrap(),
            "SET FOREIGN_KEY_CHECKS=0;"
        );
        let sqlite = QueryGenerator::for_dialect(DialectKind::Sqlite);
        assert_eq!(
            sqlite.toggle_foreign_key_checks_query(true).unwrap(),
            "PRAGMA foreign_keys = ON;"
        );
        let db2 = QueryGenerator::for_dialect(DialectKind::Db2);
        assert!(db2.toggle_foreign_key_checks_query(true).is_err());
    }
}
