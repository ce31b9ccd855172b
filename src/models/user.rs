//! Modelo de Usuario
//!
//! Este módulo contiene el struct Usuario, su tipo y los datos de registro.
//! El hash de contraseña y el token de recuperación nunca se serializan.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::any::AnyRow;
use sqlx::{FromRow, Row};

use crate::database::dialect::{as_bool, DatabaseKind};

/// Tipo de usuario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipoUsuario {
    Regular,
    Admin,
}

impl TipoUsuario {
    pub fn as_str(&self) -> &'static str {
        match self {
            TipoUsuario::Regular => "regular",
            TipoUsuario::Admin => "admin",
        }
    }
}

impl fmt::Display for TipoUsuario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TipoUsuario {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "regular" => Ok(TipoUsuario::Regular),
            "admin" => Ok(TipoUsuario::Admin),
            other => Err(format!("Tipo de usuario desconocido: {}", other)),
        }
    }
}

/// Usuario - mapea a la tabla usuarios
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Usuario {
    pub id: String,
    pub nombre: String,
    pub apellido: Option<String>,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(skip_serializing)]
    pub reset_token: Option<String>,
    pub telefono: Option<String>,
    pub tipo_usuario: TipoUsuario,
    pub municipio_preferido: Option<String>,
    pub activo: bool,
    pub fecha_registro: Option<String>,
    pub fecha_actualizacion: Option<String>,
    pub ultimo_acceso: Option<String>,
}

/// Datos para registrar un usuario
#[derive(Debug, Clone)]
pub struct NuevoUsuario {
    pub nombre: String,
    pub apellido: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub telefono: Option<String>,
    pub tipo_usuario: TipoUsuario,
    pub municipio_preferido: Option<String>,
}

/// Cambios de perfil. `None` deja el campo intacto.
#[derive(Debug, Clone, Default)]
pub struct CambiosUsuario {
    pub nombre: Option<String>,
    pub apellido: Option<String>,
    pub email: Option<String>,
    pub telefono: Option<String>,
    pub municipio_preferido: Option<String>,
}

impl CambiosUsuario {
    pub fn is_empty(&self) -> bool {
        self.nombre.is_none()
            && self.apellido.is_none()
            && self.email.is_none()
            && self.telefono.is_none()
            && self.municipio_preferido.is_none()
    }
}

impl Usuario {
    pub fn columns(kind: DatabaseKind) -> String {
        format!(
            "id, nombre, apellido, email, password_hash, reset_token, telefono, tipo_usuario, \
             municipio_preferido, {} AS activo, {} AS fecha_registro, \
             {} AS fecha_actualizacion, {} AS ultimo_acceso",
            kind.flag("activo"),
            kind.text("fecha_registro"),
            kind.text("fecha_actualizacion"),
            kind.text("ultimo_acceso")
        )
    }

    pub fn is_admin(&self) -> bool {
        self.tipo_usuario == TipoUsuario::Admin
    }
}

impl<'r> FromRow<'r, AnyRow> for Usuario {
    fn from_row(row: &'r AnyRow) -> Result<Self, sqlx::Error> {
        let tipo: String = row.try_get("tipo_usuario")?;
        let tipo_usuario: TipoUsuario = tipo.parse().map_err(|e: String| sqlx::Error::ColumnDecode {
            index: "tipo_usuario".to_string(),
            source: e.into(),
        })?;

        Ok(Self {
            id: row.try_get("id")?,
            nombre: row.try_get("nombre")?,
            apellido: row.try_get("apellido")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            reset_token: row.try_get("reset_token")?,
            telefono: row.try_get("telefono")?,
            tipo_usuario,
            municipio_preferido: row.try_get("municipio_preferido")?,
            activo: as_bool(row.try_get("activo")?),
            fecha_registro: row.try_get("fecha_registro")?,
            fecha_actualizacion: row.try_get("fecha_actualizacion")?,
            ultimo_acceso: row.try_get("ultimo_acceso")?,
        })
    }
}
