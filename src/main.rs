use poem::{listener::TcpListener, Route, Server};
use poem_openapi::OpenApiService;

use medequip_backend::api::{AuthApi, DepartmentsApi, HealthApi, SuppliersApi, UsersApi};
use medequip_backend::app_data::AppData;
use medequip_backend::config::{
    init_database, init_logging, migrate_database, AppSettings, JwtSettings,
};

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    let settings = AppSettings::from_env();

    // A missing JWT secret must stop the process, not surface later as
    // per-request failures
    let jwt_settings = match JwtSettings::from_env() {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration, refusing to start");
            std::process::exit(1);
        }
    };

    let db = match init_database(&settings.database_url).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!(error = %e, url = %settings.database_url, "database connection failed");
            std::process::exit(1);
        }
    };

    if let Err(e) = migrate_database(&db).await {
        tracing::error!(error = %e, "database migration failed");
        std::process::exit(1);
    }

    tracing::info!(url = %settings.database_url, "database ready");

    let app_data = AppData::init(db, jwt_settings);

    let auth_api = AuthApi::new(app_data.auth_service.clone());
    let users_api = UsersApi::new(
        app_data.gate.clone(),
        app_data.user_store.clone(),
        app_data.audit.clone(),
    );
    let departments_api = DepartmentsApi::new(
        app_data.gate.clone(),
        app_data.department_store.clone(),
        app_data.audit.clone(),
    );
    let suppliers_api = SuppliersApi::new(
        app_data.gate.clone(),
        app_data.supplier_store.clone(),
        app_data.audit.clone(),
    );

    let api_service = OpenApiService::new(
        (HealthApi, auth_api, users_api, departments_api, suppliers_api),
        "Hospital Equipment Management API",
        "1.0.0",
    )
    .server("http://localhost:3000/api");

    let ui = api_service.swagger_ui();

    let app = Route::new().nest("/api", api_service).nest("/swagger", ui);

    tracing::info!(addr = %settings.bind_addr, "starting server");
    tracing::info!("Swagger UI available at /swagger");

    Server::new(TcpListener::bind(settings.bind_addr)).run(app).await
}
