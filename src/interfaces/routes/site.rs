use actix_web::web;

use crate::handlers::{contact_me, site};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(contact_me::submit_contact_form);

    cfg.service(
        web::scope("/site")
            .service(site::site_projects)
            .service(site::site_certifications)
            .service(site::site_home)
    );
}
