use super::handler;
use super::middleware::with_auth;
use crate::server::Server;
use std::convert::Infallible;
use std::sync::Arc;
use warp::Filter;

pub fn routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let create_user = warp::post()
        .and(warp::path("users"))
        .and(warp::path::end())
        .and(warp::body::json())
        .and(with(server.auth_service.clone()))
        .and_then(handler::create_user);

    let login = warp::post()
        .and(warp::path("users"))
        .and(warp::path("login"))
        .and(warp::path::end())
        .and(warp::body::json())
        .and(with(server.auth_service.clone()))
        .and_then(handler::login);

    let renew_access_token = warp::post()
        .and(warp::path("tokens"))
        .and(warp::path("renew_access"))
        .and(warp::path::end())
        .and(warp::body::json())
        .and(with(server.auth_service.clone()))
        .and_then(handler::renew_access_token);

    let logout = warp::post()
        .and(warp::path("users"))
        .and(warp::path("logout"))
        .and(warp::path::end())
        .and(warp::body::json())
        .and(with_auth(server.token_maker.clone()))
        .and(with(server.auth_service.clone()))
        .and_then(handler::logout);

    let update_user = warp::put()
        .and(warp::path("users"))
        .and(warp::path::end())
        .and(warp::body::json())
        .and(with_auth(server.token_maker.clone()))
        .and(with(server.auth_service.clone()))
        .and_then(handler::update_user);

    let create_account = warp::post()
        .and(warp::path("accounts"))
        .and(warp::path::end())
        .and(warp::body::json())
        .and(with_auth(server.token_maker.clone()))
        .and(with(server.account_service.clone()))
        .and_then(handler::create_account);

    let get_account = warp::get()
        .and(warp::path("accounts"))
        .and(warp::path::param::<i64>())
        .and(warp::path::end())
        .and(with_auth(server.token_maker.clone()))
        .and(with(server.account_service.clone()))
        .and_then(handler::get_account);

    let list_accounts = warp::get()
        .and(warp::path("accounts"))
        .and(warp::path::end())
        .and(warp::query::<handler::ListAccountsQuery>())
        .and(with_auth(server.token_maker.clone()))
        .and(with(server.account_service.clone()))
        .and_then(handler::list_accounts);

    let delete_account = warp::delete()
        .and(warp::path("accounts"))
        .and(warp::path::param::<i64>())
        .and(warp::path::end())
        .and(with_auth(server.token_maker.clone()))
        .and(with(server.account_service.clone()))
        .and_then(handler::delete_account);

    let create_transfer = warp::post()
        .and(warp::path("transfers"))
        .and(warp::path::end())
        .and(warp::body::json())
        .and(with_auth(server.token_maker.clone()))
        .and(with(server.account_service.clone()))
        .and_then(handler::create_transfer);

    create_user
        .or(login)
        .or(renew_access_token)
        .or(logout)
        .or(update_user)
        .or(create_account)
        .or(list_accounts)
        .or(get_account)
        .or(delete_account)
        .or(create_transfer)
}

fn with<ServiceType>(
    service: Arc<ServiceType>,
) -> impl Filter<Extract = (Arc<ServiceType>,), Error = Infallible> + Clone
where
    ServiceType: Send + Sync + ?Sized,
{
    warp::any().map(move || service.clone())
}
