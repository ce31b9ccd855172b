//! Dialecto SQL
//!
//! El servidor corre contra MySQL o PostgreSQL según `DB_TYPE`. Las consultas
//! se escriben una sola vez con placeholders `?` y se adaptan aquí. Los helpers
//! de columnas fuerzan tipos que ambos drivers decodifican igual a través del
//! pool `Any`: números como `DOUBLE`, fechas y JSON como texto, flags como 0/1.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::config::environment::ConfigError;

/// Motor de base de datos soportado
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseKind {
    MySql,
    PostgreSql,
}

impl FromStr for DatabaseKind {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mysql" => Ok(DatabaseKind::MySql),
            "postgresql" | "postgres" => Ok(DatabaseKind::PostgreSql),
            other => Err(ConfigError::UnsupportedDatabase(other.to_string())),
        }
    }
}

impl fmt::Display for DatabaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseKind::MySql => write!(f, "mysql"),
            DatabaseKind::PostgreSql => write!(f, "postgresql"),
        }
    }
}

impl DatabaseKind {
    /// Reescribe placeholders `?` como `$1..$n` en PostgreSQL.
    /// Los `?` dentro de literales con comilla simple no se tocan.
    pub fn adapt_query<'a>(&self, sql: &'a str) -> Cow<'a, str> {
        match self {
            DatabaseKind::MySql => Cow::Borrowed(sql),
            DatabaseKind::PostgreSql => {
                if !sql.contains('?') {
                    return Cow::Borrowed(sql);
                }

                let mut out = String::with_capacity(sql.len() + 8);
                let mut index = 0;
                let mut in_literal = false;

                for c in sql.chars() {
                    match c {
                        '\'' => {
                            in_literal = !in_literal;
                            out.push(c);
                        }
                        '?' if !in_literal => {
                            index += 1;
                            out.push('$');
                            out.push_str(&index.to_string());
                        }
                        _ => out.push(c),
                    }
                }

                Cow::Owned(out)
            }
        }
    }

    /// Columna numérica (DECIMAL, INT, ...) leída como `f64`
    pub fn num(&self, expr: &str) -> String {
        match self {
            DatabaseKind::MySql => format!("CAST({} AS DOUBLE)", expr),
            DatabaseKind::PostgreSql => format!("CAST({} AS DOUBLE PRECISION)", expr),
        }
    }

    /// Columna de fecha o JSON leída como texto
    pub fn text(&self, expr: &str) -> String {
        match self {
            DatabaseKind::MySql => format!("CAST({} AS CHAR)", expr),
            DatabaseKind::PostgreSql => format!("CAST({} AS TEXT)", expr),
        }
    }

    /// Flag booleano leído como entero 0/1
    pub fn flag(&self, expr: &str) -> String {
        self.int(&format!("CASE WHEN {} THEN 1 ELSE 0 END", expr))
    }

    /// Entero (conteos, ids seriales) leído como `i64`
    pub fn int(&self, expr: &str) -> String {
        match self {
            DatabaseKind::MySql => format!("CAST({} AS SIGNED)", expr),
            DatabaseKind::PostgreSql => format!("CAST({} AS BIGINT)", expr),
        }
    }

    /// Expresión de fecha/hora actual
    pub fn now(&self) -> &'static str {
        match self {
            DatabaseKind::MySql => "NOW()",
            DatabaseKind::PostgreSql => "CURRENT_TIMESTAMP",
        }
    }

    /// Placeholder para un parámetro JSON (texto)
    pub fn json_param(&self) -> &'static str {
        match self {
            DatabaseKind::MySql => "?",
            DatabaseKind::PostgreSql => "CAST(? AS JSONB)",
        }
    }

    /// Puerto por defecto del motor
    pub fn default_port(&self) -> u16 {
        match self {
            DatabaseKind::MySql => 3306,
            DatabaseKind::PostgreSql => 5432,
        }
    }

    /// Esquema de la URL de conexión
    pub fn scheme(&self) -> &'static str {
        match self {
            DatabaseKind::MySql => "mysql",
            DatabaseKind::PostgreSql => "postgres",
        }
    }
}

/// Convierte un flag decodificado como entero en `bool`
pub fn as_bool(value: i64) -> bool {
    value != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind() {
        assert_eq!("mysql".parse::<DatabaseKind>().unwrap(), DatabaseKind::MySql);
        assert_eq!("PostgreSQL".parse::<DatabaseKind>().unwrap(), DatabaseKind::PostgreSql);
        assert_eq!("postgres".parse::<DatabaseKind>().unwrap(), DatabaseKind::PostgreSql);
        assert!("sqlite".parse::<DatabaseKind>().is_err());
    }

    #[test]
    fn test_mysql_query_is_untouched() {
        let sql = "SELECT * FROM rutas WHERE municipio_id = ? AND activa = 1";
        assert_eq!(DatabaseKind::MySql.adapt_query(sql), sql);
    }

    #[test]
    fn test_postgres_placeholders_are_numbered_in_order() {
        let sql = "UPDATE rutas SET nombre = ?, origen = ? WHERE id = ?";
        assert_eq!(
            DatabaseKind::PostgreSql.adapt_query(sql),
            "UPDATE rutas SET nombre = $1, origen = $2 WHERE id = $3"
        );
    }

    #[test]
    fn test_postgres_ignores_question_marks_in_literals() {
        let sql = "SELECT '¿Qué?' AS pregunta, id FROM rutas WHERE id = ? AND notas <> 'a?b'";
        assert_eq!(
            DatabaseKind::PostgreSql.adapt_query(sql),
            "SELECT '¿Qué?' AS pregunta, id FROM rutas WHERE id = $1 AND notas <> 'a?b'"
        );
    }

    #[test]
    fn test_column_helpers() {
        assert_eq!(DatabaseKind::MySql.num("r.costo_minimo"), "CAST(r.costo_minimo AS DOUBLE)");
        assert_eq!(
            DatabaseKind::PostgreSql.text("h.salidas"),
            "CAST(h.salidas AS TEXT)"
        );
        assert_eq!(
            DatabaseKind::PostgreSql.flag("activa"),
            "CAST(CASE WHEN activa THEN 1 ELSE 0 END AS BIGINT)"
        );
        assert_eq!(DatabaseKind::PostgreSql.json_param(), "CAST(? AS JSONB)");
    }

    #[test]
    fn test_flag_conversions() {
        assert!(as_bool(1));
        assert!(!as_bool(0));
    }
}
