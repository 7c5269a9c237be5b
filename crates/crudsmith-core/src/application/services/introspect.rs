//! Live-table field source.
//!
//! Reads column and foreign-key metadata through a [`SchemaReader`] and maps
//! it onto the same `FieldSpec`/`RelationSpec` values manual entry produces.

use tracing::{debug, instrument, warn};

use crate::application::ApplicationError;
use crate::application::ports::{ColumnInfo, ForeignKeyInfo, SchemaReader};
use crate::domain::{
    DbType, FieldFlags, FieldOptions, FieldSpec, NormalizedEntries, RelationKind, RelationSpec,
    Validations, is_identifier, model_name_for_table,
};
use crate::error::CrudsmithResult;

const TIMESTAMP_COLUMNS: [&str; 2] = ["created_at", "updated_at"];

/// Builds field lists from existing tables.
pub struct IntrospectionService {
    reader: Box<dyn SchemaReader>,
}

impl IntrospectionService {
    pub fn new(reader: Box<dyn SchemaReader>) -> Self {
        Self { reader }
    }

    /// Describe `table`, leaving out columns named in `ignored`.
    ///
    /// Foreign-key columns are always kept, ignored or not. Columns whose
    /// names are not identifiers (`"first name"`, `"2fa"`) are skipped.
    #[instrument(skip(self, ignored), fields(connection = %self.reader.connection_name()))]
    pub fn describe_table(
        &self,
        table: &str,
        ignored: &[String],
    ) -> CrudsmithResult<NormalizedEntries> {
        if !self.reader.table_exists(table)? {
            return Err(ApplicationError::TableNotFound {
                table: table.to_owned(),
                connection: self.reader.connection_name(),
            }
            .into());
        }

        let columns = self.reader.columns(table)?;
        let foreign_keys = self.reader.foreign_keys(table)?;
        let is_foreign = |name: &str| foreign_keys.iter().any(|fk| fk.column == name);

        let mut out = NormalizedEntries::default();
        for column in &columns {
            if !is_identifier(&column.name) {
                warn!(column = %column.name, "column name is not an identifier, skipped");
                continue;
            }
            if ignored.iter().any(|i| i == &column.name) && !is_foreign(&column.name) {
                debug!(column = %column.name, "ignored");
                continue;
            }
            out.fields.push(field_for_column(column)?);
        }
        out.relations = foreign_keys
            .iter()
            .filter(|fk| is_identifier(&fk.column))
            .map(relation_for_foreign_key)
            .collect();

        debug!(
            fields = out.fields.len(),
            relations = out.relations.len(),
            "table described"
        );
        Ok(out)
    }
}

/// Map a declared column type to the closest `DbType`.
///
/// Size and precision suffixes (`(255)`, `(8,2)`) and case are ignored;
/// `tinyint(1)` is treated as a boolean. `None` when nothing matches.
pub fn map_native_type(native: &str) -> Option<DbType> {
    let lower = native.trim().to_ascii_lowercase();
    if lower.replace(' ', "").starts_with("tinyint(1)") {
        return Some(DbType::Boolean);
    }

    let base = lower.split('(').next().unwrap_or_default().trim();
    let base = base
        .strip_suffix(" unsigned")
        .unwrap_or(base)
        .trim_end();

    let mapped = match base {
        "int" | "integer" | "smallint" | "mediumint" | "tinyint" => DbType::Integer,
        "bigint" => DbType::BigInteger,
        "bool" | "boolean" => DbType::Boolean,
        "varchar" | "char" | "character" | "nvarchar" | "nchar" | "varying character"
        | "character varying" | "uuid" | "string" => DbType::String,
        "text" | "tinytext" | "mediumtext" | "longtext" | "clob" => DbType::Text,
        "real" | "double" | "double precision" => DbType::Double,
        "float" => DbType::Float,
        "decimal" | "numeric" => DbType::Decimal,
        "date" => DbType::Date,
        "datetime" => DbType::DateTime,
        "timestamp" => DbType::Timestamp,
        "time" => DbType::Time,
        "json" | "jsonb" => DbType::Json,
        _ => return None,
    };
    Some(mapped)
}

fn field_for_column(column: &ColumnInfo) -> CrudsmithResult<FieldSpec> {
    let mapped = map_native_type(&column.native_type).unwrap_or_else(|| {
        warn!(
            column = %column.name,
            native_type = %column.native_type,
            "unmapped column type, using string"
        );
        DbType::String
    });

    if column.primary {
        let db_type = if matches!(mapped, DbType::Integer | DbType::BigInteger) {
            DbType::Id
        } else {
            mapped
        };
        let flags = FieldFlags::from_options(&FieldOptions::primary_key());
        return Ok(FieldSpec::try_new(
            column.name.as_str(),
            db_type,
            None,
            Validations::new(),
            flags,
        )?);
    }

    if TIMESTAMP_COLUMNS.contains(&column.name.as_str()) {
        let flags = FieldFlags::from_options(&FieldOptions::timestamp());
        return Ok(FieldSpec::try_new(
            column.name.as_str(),
            mapped,
            None,
            Validations::new(),
            flags,
        )?);
    }

    let validations = Validations::new().with(if column.nullable {
        "nullable"
    } else {
        "required"
    });
    Ok(FieldSpec::try_new(
        column.name.as_str(),
        mapped,
        None,
        validations,
        FieldFlags::default(),
    )?)
}

fn relation_for_foreign_key(fk: &ForeignKeyInfo) -> RelationSpec {
    RelationSpec::single(
        RelationKind::BelongsTo,
        model_name_for_table(&fk.referenced_table),
        fk.column.as_str(),
        fk.referenced_column.as_str(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockSchemaReader;
    use crate::error::CrudsmithError;
    use crate::domain::HtmlType;

    fn column(name: &str, native: &str, nullable: bool, primary: bool) -> ColumnInfo {
        ColumnInfo {
            name: name.into(),
            native_type: native.into(),
            nullable,
            default: None,
            primary,
        }
    }

    fn posts_reader() -> MockSchemaReader {
        let mut reader = MockSchemaReader::new();
        reader
            .expect_connection_name()
            .returning(|| "main".to_owned());
        reader.expect_table_exists().returning(|_| Ok(true));
        reader.expect_columns().returning(|_| {
            Ok(vec![
                column("id", "INTEGER", false, true),
                column("title", "varchar(255)", false, false),
                column("author_id", "INTEGER", false, false),
                column("created_at", "timestamp", true, false),
            ])
        });
        reader.expect_foreign_keys().returning(|_| {
            Ok(vec![ForeignKeyInfo {
                column: "author_id".into(),
                referenced_table: "authors".into(),
                referenced_column: "id".into(),
            }])
        });
        reader
    }

    #[test]
    fn describes_posts_table() {
        let service = IntrospectionService::new(Box::new(posts_reader()));
        let out = service.describe_table("posts", &[]).unwrap();

        assert_eq!(out.fields.len(), 4);
        assert_eq!(out.relations.len(), 1);
        assert_eq!(out.relations[0].kind(), RelationKind::BelongsTo);
        assert_eq!(out.relations[0].inputs(), ["Author", "author_id", "id"]);

        let id = &out.fields[0];
        assert_eq!(id.db_type(), DbType::Id);
        assert!(id.is_primary() && !id.is_fillable() && !id.in_form());

        let title = &out.fields[1];
        assert_eq!(title.db_type(), DbType::String);
        assert_eq!(title.html_type(), HtmlType::Text);
        assert!(title.validations().contains("required"));

        let created = &out.fields[3];
        assert!(!created.is_searchable() && created.in_view() && !created.in_index());
    }

    #[test]
    fn ignored_columns_are_dropped_except_foreign_keys() {
        let service = IntrospectionService::new(Box::new(posts_reader()));
        let ignored = vec!["title".to_owned(), "author_id".to_owned()];
        let out = service.describe_table("posts", &ignored).unwrap();

        let names: Vec<&str> = out.fields.iter().map(FieldSpec::name).collect();
        assert_eq!(names, ["id", "author_id", "created_at"]);
        assert_eq!(out.relations.len(), 1);
    }

    #[test]
    fn non_identifier_columns_are_skipped() {
        let mut reader = MockSchemaReader::new();
        reader
            .expect_connection_name()
            .returning(|| "main".to_owned());
        reader.expect_table_exists().returning(|_| Ok(true));
        reader.expect_columns().returning(|_| {
            Ok(vec![
                column("id", "INTEGER", false, true),
                column("first name", "TEXT", true, false),
                column("2fa", "BOOLEAN", true, false),
                column("owner ref", "INTEGER", true, false),
                column("email", "TEXT", false, false),
            ])
        });
        reader.expect_foreign_keys().returning(|_| {
            Ok(vec![ForeignKeyInfo {
                column: "owner ref".into(),
                referenced_table: "users".into(),
                referenced_column: "id".into(),
            }])
        });

        let out = IntrospectionService::new(Box::new(reader))
            .describe_table("people", &[])
            .unwrap();
        let names: Vec<&str> = out.fields.iter().map(FieldSpec::name).collect();
        assert_eq!(names, ["id", "email"]);
        assert!(out.relations.is_empty());
    }

    #[test]
    fn missing_table_is_reported() {
        let mut reader = MockSchemaReader::new();
        reader
            .expect_connection_name()
            .returning(|| "main".to_owned());
        reader.expect_table_exists().returning(|_| Ok(false));
        reader.expect_columns().never();

        let service = IntrospectionService::new(Box::new(reader));
        let err = service.describe_table("ghosts", &[]).unwrap_err();
        assert!(matches!(
            err,
            CrudsmithError::Application(ApplicationError::TableNotFound { ref table, ref connection })
                if table == "ghosts" && connection == "main"
        ));
    }

    #[test]
    fn maps_native_types() {
        assert_eq!(map_native_type("VARCHAR(255)"), Some(DbType::String));
        assert_eq!(map_native_type("tinyint(1)"), Some(DbType::Boolean));
        assert_eq!(map_native_type("tinyint(4)"), Some(DbType::Integer));
        assert_eq!(map_native_type("bigint unsigned"), Some(DbType::BigInteger));
        assert_eq!(map_native_type("DECIMAL(8,2)"), Some(DbType::Decimal));
        assert_eq!(map_native_type("double precision"), Some(DbType::Double));
        assert_eq!(map_native_type("jsonb"), Some(DbType::Json));
        assert_eq!(map_native_type("geometry"), None);
    }

    #[test]
    fn unmapped_types_fall_back_to_string() {
        let field = field_for_column(&column("shape", "geometry", true, false)).unwrap();
        assert_eq!(field.db_type(), DbType::String);
        assert!(field.validations().contains("nullable"));
    }
}
