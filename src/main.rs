use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing::info;
use tracing_subscriber::EnvFilter;

use thatsfit::admin_handlers::{
    AdminAppState, admin_health_handler, get_active_users_handler, get_user_count_handler,
};
use thatsfit::app_config::AppConfig;
use thatsfit::firestore::FirestoreClient;
use thatsfit::flowise_client::{FlowiseClient, WorkoutGenerator};
use thatsfit::profile_resolver::ProfileStore;
use thatsfit::user_handlers::{
    UserAppState, create_user_handler, delete_user_handler, get_user_handler,
    get_user_workouts_handler, get_users_handler, update_steps_handler, update_user_handler,
};
use thatsfit::workout_handlers::{WorkoutAppState, create_workout_handler};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    info!("Starting server at http://{}", config.bind_address);

    let firestore = Arc::new(FirestoreClient::new(&config));
    let store: Arc<dyn ProfileStore> = firestore.clone();
    let generator: Arc<dyn WorkoutGenerator> = Arc::new(FlowiseClient::new(&config));

    let workout_state = web::Data::new(WorkoutAppState { store, generator });
    let user_state = web::Data::new(UserAppState {
        firestore: firestore.clone(),
    });
    let admin_state = web::Data::new(AdminAppState {
        firestore,
        admin_doc_id: config.admin_doc_id.clone(),
        admin_email: config.admin_email.clone(),
    });

    let bind_address = config.bind_address.clone();

    HttpServer::new(move || {
        App::new()
            .app_data(workout_state.clone())
            .app_data(user_state.clone())
            .app_data(admin_state.clone())
            .service(
                web::scope("/api")
                    // User endpoints
                    .route("/users", web::get().to(get_users_handler))
                    .route("/users", web::post().to(create_user_handler))
                    .route("/users/{user_id}", web::get().to(get_user_handler))
                    .route("/users/{user_id}", web::put().to(update_user_handler))
                    .route("/users/{user_id}", web::delete().to(delete_user_handler))
                    .route("/users/{user_id}/steps", web::put().to(update_steps_handler))
                    .route(
                        "/users/{user_id}/workouts",
                        web::get().to(get_user_workouts_handler),
                    )
                    .route(
                        "/users/{user_id}/create-workout",
                        web::post().to(create_workout_handler),
                    )
                    // Admin endpoints
                    .route("/admin/health", web::get().to(admin_health_handler))
                    .route("/admin/users/count", web::get().to(get_user_count_handler))
                    .route(
                        "/admin/users/active",
                        web::get().to(get_active_users_handler),
                    ),
            )
    })
    .bind(bind_address)?
    .run()
    .await
}
