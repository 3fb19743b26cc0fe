use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;

use super::{authorize, bearer_user, ensure_access, require_user_id};
use crate::auth::AuthService;
use crate::error::ApiError;
use crate::models::{NewTodo, TodoUpdate, UserIdQuery};
use crate::todos::TodoService;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/todo")
            .route("", web::get().to(list_tasks))
            .route("", web::post().to(add_task))
            .route("", web::put().to(update_task))
            .route("/{id}", web::delete().to(delete_task)),
    );
}

async fn list_tasks(
    req: HttpRequest,
    query: web::Query<UserIdQuery>,
    auth_service: web::Data<AuthService>,
    todos: web::Data<TodoService>,
) -> Result<HttpResponse, ApiError> {
    let user_id = require_user_id(query.user_id)?;
    ensure_access(&req, &auth_service, user_id).await?;
    let tasks = todos.list_for_user(user_id).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

async fn add_task(
    req: HttpRequest,
    body: web::Json<NewTodo>,
    auth_service: web::Data<AuthService>,
    todos: web::Data<TodoService>,
) -> Result<HttpResponse, ApiError> {
    ensure_access(&req, &auth_service, body.user_id).await?;
    let task = todos.create(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(task))
}

async fn update_task(
    req: HttpRequest,
    body: web::Json<TodoUpdate>,
    auth_service: web::Data<AuthService>,
    todos: web::Data<TodoService>,
) -> Result<HttpResponse, ApiError> {
    check_owner(&req, &auth_service, &todos, body.id).await?;
    todos.update(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Task updated" })))
}

async fn delete_task(
    req: HttpRequest,
    path: web::Path<i64>,
    auth_service: web::Data<AuthService>,
    todos: web::Data<TodoService>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    check_owner(&req, &auth_service, &todos, id).await?;
    todos.delete(id).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Task deleted" })))
}

async fn check_owner(
    req: &HttpRequest,
    auth_service: &AuthService,
    todos: &TodoService,
    task_id: i64,
) -> Result<(), ApiError> {
    let Some(user) = bearer_user(req, auth_service).await? else {
        return Ok(());
    };
    // Missing tasks fall through to the 404 from update/delete.
    match todos.owner_of(task_id).await? {
        Some(owner) => authorize(&user, owner),
        None => Ok(()),
    }
}
