use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::error::ApiError;
use crate::models::{GroupFilter, NewStudyGroup};
use crate::study_groups::StudyGroupService;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/studygroups")
            .route("", web::get().to(get_all_study_groups))
            .route("", web::post().to(create_study_group))
            .route("/{id}", web::get().to(get_study_group_by_id))
            .route("/{id}", web::delete().to(delete_study_group)),
    );
}

async fn get_all_study_groups(
    filter: web::Query<GroupFilter>,
    groups: web::Data<StudyGroupService>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(groups.list(&filter).await?))
}

async fn get_study_group_by_id(
    path: web::Path<i64>,
    groups: web::Data<StudyGroupService>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(groups.get(path.into_inner()).await?))
}

async fn create_study_group(
    body: web::Json<NewStudyGroup>,
    groups: web::Data<StudyGroupService>,
) -> Result<HttpResponse, ApiError> {
    let group = groups.create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(group))
}

async fn delete_study_group(
    path: web::Path<i64>,
    groups: web::Data<StudyGroupService>,
) -> Result<HttpResponse, ApiError> {
    groups.delete(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Study group deleted" })))
}
