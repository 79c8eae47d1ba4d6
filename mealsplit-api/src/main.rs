use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{delete, error, get, post, put, web, App, HttpResponse, HttpServer, Responder};
use itertools::Itertools;
use log::info;
use serde::{Deserialize, Serialize};

use mealsplit_db::{connection::Connection, roster::RosterRepositoryImpl};
use mealsplit_model::{allocation::Share, user::User};
use mealsplit_roster::Roster;

#[derive(Debug, Serialize)]
struct FoodWeight {
    expression: String,
    grams: f64,
}

#[derive(Debug, Deserialize)]
struct Expression {
    expression: String,
}

#[derive(Debug, Serialize)]
struct Resolution {
    display: String,
}

#[derive(Debug, Deserialize)]
struct AllocationQuery {
    #[serde(default)]
    two_meals: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ShareView {
    user_id: u32,
    name: String,
    grams: f64,
    rounded_grams: i64,
}

impl From<Share> for ShareView {
    fn from(share: Share) -> Self {
        Self {
            rounded_grams: share.rounded_grams(),
            user_id: share.user_id,
            name: share.name,
            grams: share.grams,
        }
    }
}

#[get("/users")]
async fn list_users(roster: web::Data<Roster>) -> impl Responder {
    let users: Vec<User> = roster
        .users()
        .await
        .into_iter()
        .sorted_by_key(|user| user.id)
        .collect();
    web::Json(users)
}

#[post("/users")]
async fn add_user(roster: web::Data<Roster>) -> impl Responder {
    HttpResponse::Created().json(roster.add_user().await)
}

#[put("/users/{id}")]
async fn update_user(
    roster: web::Data<Roster>,
    path: web::Path<u32>,
    body: web::Json<User>,
) -> actix_web::Result<impl Responder> {
    let mut user = body.into_inner();
    user.id = path.into_inner();
    match roster.update_user(user).await {
        Some(updated) => Ok(web::Json(updated)),
        None => Err(error::ErrorNotFound("no such user")),
    }
}

#[delete("/users/{id}")]
async fn delete_user(
    roster: web::Data<Roster>,
    path: web::Path<u32>,
) -> actix_web::Result<impl Responder> {
    if roster.delete_user(path.into_inner()).await {
        Ok(HttpResponse::NoContent())
    } else {
        Err(error::ErrorNotFound("no such user"))
    }
}

#[post("/users/{id}/selection")]
async fn toggle_selection(
    roster: web::Data<Roster>,
    path: web::Path<u32>,
) -> actix_web::Result<impl Responder> {
    match roster.toggle_selection(path.into_inner()).await {
        Some(updated) => Ok(web::Json(updated)),
        None => Err(error::ErrorNotFound("no such user")),
    }
}

#[get("/food-weight")]
async fn food_weight(roster: web::Data<Roster>) -> impl Responder {
    web::Json(FoodWeight {
        expression: roster.food_weight().await,
        grams: roster.evaluated_food_weight().await,
    })
}

#[put("/food-weight")]
async fn set_food_weight(
    roster: web::Data<Roster>,
    body: web::Json<Expression>,
) -> impl Responder {
    roster.set_food_weight(body.into_inner().expression).await;
    web::Json(FoodWeight {
        expression: roster.food_weight().await,
        grams: roster.evaluated_food_weight().await,
    })
}

#[post("/food-weight/resolve")]
async fn resolve_food_weight(
    roster: web::Data<Roster>,
    body: web::Json<Expression>,
) -> impl Responder {
    web::Json(Resolution {
        display: roster.resolve_food_weight(&body.expression),
    })
}

#[get("/allocation")]
async fn allocation(
    roster: web::Data<Roster>,
    query: web::Query<AllocationQuery>,
) -> impl Responder {
    let shares: Vec<ShareView> = roster
        .allocate(query.two_meals)
        .await
        .into_iter()
        .map(ShareView::from)
        .collect();
    web::Json(shares)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    log4rs::init_file("log4rs.yml", Default::default()).unwrap();

    info!("Connecting to database");
    let conn = Connection::establish().await.unwrap();
    let repository = Arc::new(RosterRepositoryImpl::new(conn));

    info!("Restoring roster");
    let roster = web::Data::new(
        Roster::load(repository, mealsplit_eval::create())
            .await
            .unwrap(),
    );
    let roster_handle = roster.clone();

    let result = HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(roster.clone())
            .service(list_users)
            .service(add_user)
            .service(update_user)
            .service(delete_user)
            .service(toggle_selection)
            .service(food_weight)
            .service(set_food_weight)
            .service(resolve_food_weight)
            .service(allocation)
    })
    .bind(("127.0.0.1", 8080))?
    .run()
    .await;

    info!("Server stopped, waiting for pending roster writes");
    roster_handle.flush().await;
    result
}
