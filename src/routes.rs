use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};

use crate::{
    api::{admin, attendance, employee, live, views},
    auth::{handlers, middleware::session_middleware},
    config::Config,
};

fn build_limiter(requests_per_min: u32) -> GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware> {
    let requests_per_min = requests_per_min.max(1);
    GovernorConfigBuilder::default()
        .per_millisecond(60_000 / requests_per_min as u64)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .unwrap_or_default()
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    let session_limit = build_limiter(config.rate_session_per_min);
    let api_limit = build_limiter(config.rate_api_per_min);

    // Public
    cfg.service(views::index).service(
        web::scope("/auth").service(
            web::resource("/anonymous")
                .wrap(Governor::new(&session_limit))
                .route(web::post().to(handlers::anonymous_sign_in)),
        ),
    );

    // Pages
    cfg.service(
        web::resource("/admin")
            .wrap(from_fn(session_middleware))
            .wrap(Governor::new(&api_limit))
            .route(web::get().to(views::admin_page)),
    )
    .service(
        web::resource("/employees")
            .wrap(from_fn(session_middleware))
            .wrap(Governor::new(&api_limit))
            .route(web::get().to(views::directory_page)),
    )
    .service(
        web::resource("/attendance")
            .wrap(from_fn(session_middleware))
            .wrap(Governor::new(&api_limit))
            .route(web::get().to(views::attendance_page)),
    );

    // API
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(session_middleware))
            .wrap(Governor::new(&api_limit))
            .service(
                web::scope("/employees")
                    // /employees
                    .service(
                        web::resource("")
                            .route(web::post().to(employee::create_employee))
                            .route(web::get().to(employee::list_employees)),
                    )
                    // /employees/live, ahead of /{id}
                    .service(web::resource("/live").route(web::get().to(live::employees_live)))
                    // /employees/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(employee::get_employee))
                            .route(web::put().to(employee::update_employee))
                            .route(web::delete().to(employee::delete_employee)),
                    )
                    // /employees/{id}/attendance
                    .service(
                        web::resource("/{id}/attendance")
                            .route(web::get().to(employee::employee_attendance)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    .service(
                        web::resource("")
                            .route(web::post().to(attendance::mark_attendance))
                            .route(web::get().to(attendance::list_attendance)),
                    )
                    .service(web::resource("/live").route(web::get().to(live::attendance_live))),
            )
            .service(web::resource("/dashboard").route(web::get().to(admin::dashboard)))
            .service(web::resource("/admin/seed").route(web::post().to(admin::seed_sample_data))),
    );
}

