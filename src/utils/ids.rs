//! Generación de identificadores de texto (`rt-1718000000000-k3j9x0a2b`)

use rand::{distributions::Alphanumeric, Rng};

/// Prefijos usados por cada entidad
pub const USER_PREFIX: &str = "usr";
pub const ROUTE_PREFIX: &str = "rt";
pub const SAVED_ROUTE_PREFIX: &str = "rg";
pub const COMPANY_PREFIX: &str = "emp";

/// Genera `<prefijo>-<epoch ms>-<9 caracteres aleatorios en minúscula>`
pub fn generate_id(prefix: &str) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(|b| (b as char).to_ascii_lowercase())
        .collect();

    format!("{}-{}-{}", prefix, chrono::Utc::now().timestamp_millis(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_id_shape() {
        let id = generate_id(ROUTE_PREFIX);
        let parts: Vec<&str> = id.split('-').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "rt");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 9);
        assert!(parts[2].chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_generate_id_is_unique() {
        assert_ne!(generate_id(USER_PREFIX), generate_id(USER_PREFIX));
    }
}
