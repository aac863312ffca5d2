use std::path::PathBuf;

use actix_files::Files;
use actix_web::{HttpResponse, Responder, get, http::header::ContentType, web};
use odvoz_core::store::SnapshotStore;

use crate::ui;

/// State shared by all request workers.
#[derive(Clone)]
pub(crate) struct AppState {
    pub store: SnapshotStore,
    pub static_dir: PathBuf,
}

impl AppState {
    pub(crate) fn new(store: SnapshotStore, static_dir: PathBuf) -> Self {
        Self { store, static_dir }
    }

    /// Register the routes served by odvoz.
    pub(crate) fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.store.clone()))
            .service(index)
            .service(Files::new("/static", self.static_dir.clone()));
    }
}

// Only ever reads the in-memory snapshot; scraper failures cannot surface here.
#[get("/")]
async fn index(store: web::Data<SnapshotStore>) -> impl Responder {
    let status = store.status().await;
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(ui::render(&status))
}

#[cfg(test)]
mod tests {
    use actix_web::{App, http::StatusCode, test};
    use odvoz_core::model::{CategoryReading, WasteCategory, WasteSnapshot};

    use super::*;

    fn state(static_dir: PathBuf) -> AppState {
        AppState::new(SnapshotStore::new(), static_dir)
    }

    #[actix_web::test]
    async fn index_before_first_cycle_renders_empty_fields() {
        let state = state(PathBuf::from("./static"));
        let app = test::init_service(App::new().configure(|cfg| state.configure(cfg))).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = test::read_body(resp).await;
        let page = String::from_utf8(body.to_vec()).expect("utf-8 page");
        assert_eq!(page.matches("<div class=\"label\"></div>").count(), 3);
        assert_eq!(page.matches("<div class=\"date\"></div>").count(), 3);
    }

    #[actix_web::test]
    async fn index_shows_latest_snapshot() {
        let state = state(PathBuf::from("./static"));
        let mut snapshot = WasteSnapshot::default();
        snapshot.set(
            WasteCategory::General,
            CategoryReading::new("Mešani komunalni odpadki", "ponedeljek, 20. 10. 2026"),
        );
        state.store.write(snapshot).await;

        let app = test::init_service(App::new().configure(|cfg| state.configure(cfg))).await;
        let body = test::call_and_read_body(&app, test::TestRequest::get().uri("/").to_request()).await;
        let page = String::from_utf8(body.to_vec()).expect("utf-8 page");

        assert!(page.contains("ponedeljek, 20. 10. 2026"), "{page}");
    }

    #[actix_web::test]
    async fn serves_static_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(dir.path().join("mko.svg"), "<svg/>").expect("write icon");
        let state = state(dir.path().to_path_buf());
        let app = test::init_service(App::new().configure(|cfg| state.configure(cfg))).await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/static/mko.svg").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(test::read_body(resp).await.as_ref(), b"<svg/>");

        let missing = test::call_service(
            &app,
            test::TestRequest::get().uri("/static/none.svg").to_request(),
        )
        .await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn unknown_routes_are_not_found() {
        let state = state(PathBuf::from("./static"));
        let app = test::init_service(App::new().configure(|cfg| state.configure(cfg))).await;

        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/api/data").to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
