pub mod accounts;
pub mod health;
pub mod tasks;

use actix_web::web;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/accounts")
            .service(accounts::register)
            .service(accounts::login)
            .service(accounts::logout)
            .service(accounts::logout_all)
            .service(accounts::list_accounts)
            .service(accounts::me)
            .service(accounts::update_me)
            .service(accounts::delete_me)
            .service(accounts::upload_avatar)
            .service(accounts::delete_avatar)
            // Registered last so the literal /me resources win over {id}.
            .service(accounts::get_avatar),
    )
    .service(
        web::scope("/tasks")
            .service(tasks::list_tasks)
            .service(tasks::create_task)
            .service(tasks::get_task)
            .service(tasks::update_task)
            .service(tasks::delete_task),
    );
}
