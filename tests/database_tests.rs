//! Pruebas contra una base de datos real con el esquema de `schema/`.
//! Solo corren si `TEST_DATABASE_URL` está definida (`TEST_DB_TYPE` elige
//! el dialecto, PostgreSQL por defecto).

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::json;

use mobzi_api::database::DatabaseConnection;
use mobzi_api::{create_app, AppState};

mod common;

use common::{body_json, get, json_request, lazy_database, send, test_config};

fn database() -> Option<(Router, DatabaseConnection)> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let kind = std::env::var("TEST_DB_TYPE").unwrap_or_else(|_| "postgresql".to_string());

    let db = lazy_database(&kind, &url);
    let app = create_app(AppState::new(db.clone(), test_config(&[])));
    Some((app, db))
}

fn database_app() -> Option<Router> {
    database().map(|(app, _)| app)
}

fn unique_suffix() -> String {
    format!(
        "{}{}",
        chrono::Utc::now().timestamp_millis(),
        rand::random::<u16>()
    )
}

/// Filas de prueba: un municipio activo y uno inactivo, una empresa,
/// una ruta activa y una inactiva
struct Seed {
    municipio_activo: String,
    municipio_inactivo: String,
    ruta_activa: String,
    ruta_inactiva: String,
}

async fn seed(db: &DatabaseConnection) -> Seed {
    let s = unique_suffix();
    let seed = Seed {
        municipio_activo: format!("mun-a-{}", s),
        municipio_inactivo: format!("mun-i-{}", s),
        ruta_activa: format!("rt-a-{}", s),
        ruta_inactiva: format!("rt-i-{}", s),
    };
    let empresa = format!("emp-{}", s);

    for (id, activo) in [(&seed.municipio_activo, true), (&seed.municipio_inactivo, false)] {
        sqlx::query(&db.sql(
            "INSERT INTO municipios (id, nombre, centro_lng, centro_lat, activo) VALUES (?, ?, ?, ?, ?)",
        ))
        .bind(id.as_str())
        .bind(format!("Municipio {}", id))
        .bind(-103.35_f64)
        .bind(20.67_f64)
        .bind(activo)
        .execute(db.pool())
        .await
        .unwrap();
    }

    sqlx::query(&db.sql("INSERT INTO empresas (id, nombre, municipio_id) VALUES (?, ?, ?)"))
        .bind(empresa.as_str())
        .bind("Transportes de Prueba")
        .bind(seed.municipio_activo.as_str())
        .execute(db.pool())
        .await
        .unwrap();

    for (id, activa) in [(&seed.ruta_activa, true), (&seed.ruta_inactiva, false)] {
        sqlx::query(&db.sql(
            "INSERT INTO rutas (id, nombre, origen, destino, municipio_id, empresa_id, \
             costo_minimo, costo_maximo, activa) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        ))
        .bind(id.as_str())
        .bind(format!("Ruta {}", id))
        .bind("Centro")
        .bind("Terminal")
        .bind(seed.municipio_activo.as_str())
        .bind(empresa.as_str())
        .bind(10.0_f64)
        .bind(12.0_f64)
        .bind(activa)
        .execute(db.pool())
        .await
        .unwrap();
    }

    seed
}

/// Registra un usuario nuevo y devuelve su token de acceso
async fn register_user(app: &Router) -> String {
    let response = send(
        app,
        json_request(
            "POST",
            "/api/v1/auth/register",
            json!({
                "firstName": "Luis",
                "lastName": "Pérez",
                "email": format!("usuario-{}@mobzi.mx", unique_suffix()),
                "password": "Secreta123",
                "confirmPassword": "Secreta123",
                "acceptTerms": true
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["token"]
        .as_str()
        .unwrap()
        .to_string()
}

fn authorized(method: &str, uri: &str, token: &str, body: Option<serde_json::Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token));

    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

#[tokio::test]
async fn test_health_with_database() {
    let Some(app) = database_app() else {
        return;
    };

    let response = send(&app, get("/health")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["database"], "connected");
}

#[tokio::test]
async fn test_municipios_sorted_by_name() {
    let Some(app) = database_app() else {
        return;
    };

    let response = send(&app, get("/api/v1/municipios")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let nombres: Vec<String> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["nombre"].as_str().unwrap().to_string())
        .collect();

    let mut sorted = nombres.clone();
    sorted.sort();
    assert_eq!(nombres, sorted);
}

#[tokio::test]
async fn test_municipios_excludes_inactive() {
    let Some((app, db)) = database() else {
        return;
    };
    let seed = seed(&db).await;

    let response = send(&app, get("/api/v1/municipios")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let ids: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_str().unwrap())
        .collect();

    assert!(ids.contains(&seed.municipio_activo.as_str()));
    assert!(!ids.contains(&seed.municipio_inactivo.as_str()));
}

#[tokio::test]
async fn test_inactive_route_detail_is_404() {
    let Some((app, db)) = database() else {
        return;
    };
    let seed = seed(&db).await;

    let response = send(&app, get(&format!("/api/v1/rutas/{}", seed.ruta_inactiva))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "Ruta no encontrada");

    let response = send(&app, get(&format!("/api/v1/rutas/{}", seed.ruta_activa))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["id"], seed.ruta_activa.as_str());
    assert_eq!(body["data"]["notas"], "");
}

#[tokio::test]
async fn test_saving_route_twice_toggles() {
    let Some((app, db)) = database() else {
        return;
    };
    let seed = seed(&db).await;
    let token = register_user(&app).await;
    let save = || {
        authorized(
            "POST",
            "/api/v1/profile/rutas-guardadas",
            &token,
            Some(json!({ "rutaId": seed.ruta_activa })),
        )
    };

    let response = send(&app, save()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["guardada"], true);

    let response = send(&app, save()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["guardada"], false);
    assert!(body["data"].get("rutaGuardada").is_none());

    let response = send(
        &app,
        authorized("GET", "/api/v1/profile/rutas-guardadas", &token, None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"], json!([]));

    let response = send(
        &app,
        authorized(
            "POST",
            "/api/v1/profile/rutas-guardadas",
            &token,
            Some(json!({ "rutaId": seed.ruta_inactiva })),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_route_detail_is_404() {
    let Some(app) = database_app() else {
        return;
    };

    let response = send(&app, get("/api/v1/rutas/rt-no-existe")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "Ruta no encontrada");
}

#[tokio::test]
async fn test_register_login_and_profile_flow() {
    let Some(app) = database_app() else {
        return;
    };

    let email = format!("prueba-{}@mobzi.mx", chrono::Utc::now().timestamp_millis());

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/register",
            json!({
                "firstName": "Ana",
                "lastName": "López",
                "email": email.to_uppercase(),
                "password": "Secreta123",
                "confirmPassword": "Secreta123",
                "acceptTerms": true
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["data"]["usuario"]["email"], email);
    assert!(body["data"]["usuario"].get("passwordHash").is_none());

    // Registrar el mismo email otra vez
    let response = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/register",
            json!({
                "firstName": "Ana",
                "lastName": "López",
                "email": email,
                "password": "Secreta123",
                "confirmPassword": "Secreta123",
                "acceptTerms": true
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/login",
            json!({ "email": email, "password": "Incorrecta1" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/login",
            json!({ "email": email, "password": "Secreta123" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["data"].get("refreshToken").is_none());
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let response = send(&app, authorized("GET", "/api/v1/profile", &token, None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["preferencias"]["tema"], "auto");
    assert_eq!(body["data"]["estadisticas"]["rutasGuardadas"], 0);

    let response = send(
        &app,
        authorized(
            "PUT",
            "/api/v1/profile/preferencias",
            &token,
            Some(json!({ "tema": "oscuro" })),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["tema"], "oscuro");
    assert_eq!(body["data"]["idioma"], "es");

    let response = send(&app, authorized("GET", "/api/v1/admin/usuarios", &token, None)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(&app, authorized("DELETE", "/api/v1/profile", &token, None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, authorized("GET", "/api/v1/auth/me", &token, None)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
