//! Utilidades JWT
//!
//! Helpers para extraer tokens del header Authorization y para interpretar
//! las duraciones de expiración (`7d`, `12h`, `30m`, `45s`, `3600`).

use std::time::Duration;

use crate::utils::errors::AppError;

/// Extraer token del header Authorization
pub fn extract_token_from_header(auth_header: &str) -> Result<&str, AppError> {
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Token de autenticación requerido".to_string()))?
        .trim();

    if token.is_empty() {
        return Err(AppError::Unauthorized(
            "Token de autenticación requerido".to_string(),
        ));
    }

    Ok(token)
}

/// Interpretar una duración con sufijo de unidad. Sin sufijo se asumen segundos.
pub fn parse_expiration(value: &str) -> Option<Duration> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let (number, multiplier) = match value.chars().last()? {
        's' => (&value[..value.len() - 1], 1),
        'm' => (&value[..value.len() - 1], 60),
        'h' => (&value[..value.len() - 1], 3_600),
        'd' => (&value[..value.len() - 1], 86_400),
        c if c.is_ascii_digit() => (value, 1),
        _ => return None,
    };

    let amount: u64 = number.trim().parse().ok()?;
    amount.checked_mul(multiplier).map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_token_from_header() {
        assert_eq!(extract_token_from_header("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
        assert!(extract_token_from_header("Basic abc").is_err());
        assert!(extract_token_from_header("Bearer ").is_err());
    }

    #[test]
    fn test_parse_expiration() {
        assert_eq!(parse_expiration("7d"), Some(Duration::from_secs(7 * 86_400)));
        assert_eq!(parse_expiration("1h"), Some(Duration::from_secs(3_600)));
        assert_eq!(parse_expiration("15m"), Some(Duration::from_secs(900)));
        assert_eq!(parse_expiration("45s"), Some(Duration::from_secs(45)));
        assert_eq!(parse_expiration("3600"), Some(Duration::from_secs(3_600)));
        assert_eq!(parse_expiration("siete"), None);
        assert_eq!(parse_expiration(""), None);
    }
}
