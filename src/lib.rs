pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod store;

use axum::{
    Router,
    http::{
        HeaderValue, Method,
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    },
    routing::{get, post, put},
};
use sqlx::PgPool;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{auth::TokenService, config::Config, store::VoteStore};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub votes: Arc<dyn VoteStore>,
    pub tokens: Arc<TokenService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: PgPool, votes: Arc<dyn VoteStore>, config: Config) -> Self {
        Self {
            db,
            votes,
            tokens: Arc::new(TokenService::new(&config.jwt_secret)),
            config: Arc::new(config),
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(
            state
                .config
                .allowed_origins
                .iter()
                .filter_map(|origin| match origin.parse::<HeaderValue>() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!("Ignoring invalid allowed origin: {}", origin);
                        None
                    }
                })
                .collect::<Vec<_>>(),
        )
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE]);

    // Identity is optional on reads and required on writes; each handler
    // declares which through its extractor.
    let auth_routes = Router::new()
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/me", get(handlers::auth::me));

    let user_routes = Router::new().route(
        "/api/users/{id_or_username}",
        get(handlers::users::get_user),
    );

    let topic_routes = Router::new()
        .route(
            "/api/topics",
            get(handlers::topics::get_topics).post(handlers::topics::create_topic),
        )
        .route(
            "/api/topics/{name}",
            get(handlers::topics::get_topic)
                .put(handlers::topics::update_topic)
                .delete(handlers::topics::delete_topic),
        )
        .route(
            "/api/topics/{name}/posts",
            get(handlers::topics::get_topic_posts),
        );

    let post_routes = Router::new()
        .route("/api/posts", post(handlers::posts::create_post))
        .route("/api/posts/vote", post(handlers::posts::vote_post))
        .route(
            "/api/posts/{post_id}",
            get(handlers::posts::get_post)
                .put(handlers::posts::update_post)
                .delete(handlers::posts::delete_post),
        )
        .route(
            "/api/posts/{post_id}/score",
            get(handlers::posts::get_post_score),
        )
        .route(
            "/api/posts/{post_id}/comments",
            get(handlers::comments::get_post_comments),
        );

    let comment_routes = Router::new()
        .route("/api/comments", post(handlers::comments::create_comment))
        .route(
            "/api/comments/{comment_id}",
            put(handlers::comments::update_comment).delete(handlers::comments::delete_comment),
        );

    Router::new()
        .merge(auth_routes)
        .merge(user_routes)
        .merge(topic_routes)
        .merge(post_routes)
        .merge(comment_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
