use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::error::ApiError;
use crate::models::{NewResource, ResourceFilter};
use crate::resources::ResourceService;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/resources")
            .route("", web::get().to(get_all_resources))
            .route("", web::post().to(create_resource))
            .route("/{id}", web::get().to(get_resource_by_id))
            .route("/{id}", web::delete().to(delete_resource)),
    );
}

async fn get_all_resources(
    filter: web::Query<ResourceFilter>,
    resources: web::Data<ResourceService>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(resources.list(&filter).await?))
}

async fn get_resource_by_id(
    path: web::Path<i64>,
    resources: web::Data<ResourceService>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(resources.get(path.into_inner()).await?))
}

async fn create_resource(
    body: web::Json<NewResource>,
    resources: web::Data<ResourceService>,
) -> Result<HttpResponse, ApiError> {
    let resource = resources.create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(resource))
}

async fn delete_resource(
    path: web::Path<i64>,
    resources: web::Data<ResourceService>,
) -> Result<HttpResponse, ApiError> {
    resources.delete(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Resource deleted" })))
}
