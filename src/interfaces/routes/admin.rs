use actix_web::web;

use crate::{
    entities::{
        award::Award,
        certification::Certification,
        education::Education,
        experience::Experience,
        project::Project,
        skill::{Skill, SkillCategory},
    },
    handlers::{
        collections::{
            delete_entry, list_entries, new_draft, reorder_entries, save_entry, toggle_featured,
            toggle_visibility,
        },
        contact_me, content, system, uploads,
    },
};

/// Registers the editor endpoints of one collection under `/{slug}`.
macro_rules! collection_scope {
    ($cfg:expr, $slug:literal, $entry:ty) => {
        $cfg.service(
            web::scope($slug)
                .service(
                    web::resource("")
                        .route(web::get().to(list_entries::<$entry>))
                        .route(web::put().to(save_entry::<$entry>))
                )
                .service(web::resource("/draft").route(web::post().to(new_draft::<$entry>)))
                .service(web::resource("/reorder").route(web::post().to(reorder_entries::<$entry>)))
                .service(web::resource("/{id}").route(web::delete().to(delete_entry::<$entry>)))
                .service(
                    web::resource("/{id}/visibility")
                        .route(web::post().to(toggle_visibility::<$entry>))
                )
                .service(
                    web::resource("/{id}/featured")
                        .route(web::post().to(toggle_featured::<$entry>))
                )
        )
    };
}

fn collections(cfg: &mut web::ServiceConfig) {
    collection_scope!(cfg, "/projects", Project);
    collection_scope!(cfg, "/certifications", Certification);
    collection_scope!(cfg, "/awards", Award);
    collection_scope!(cfg, "/skill-categories", SkillCategory);
    collection_scope!(cfg, "/skills", Skill);
    collection_scope!(cfg, "/experience", Experience);
    collection_scope!(cfg, "/education", Education);
}

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .service(system::health_check)
            .service(system::admin_dashboard)
            .service(content::get_profile)
            .service(content::save_profile)
            .service(content::get_about)
            .service(content::save_about)
            .service(
                web::scope("/messages")
                    .service(contact_me::list_messages)
                    .service(contact_me::toggle_message_read)
                    .service(contact_me::get_message)
                    .service(contact_me::delete_message)
            )
            .service(
                web::scope("/uploads")
                    .service(uploads::upload_file)
                    .service(uploads::delete_file)
            )
            .configure(collections)
    );
}
