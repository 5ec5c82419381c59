use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
};
use ratatui::{Terminal, backend::TestBackend};

use std::sync::{Arc, Mutex};

use notes_client::{
    shell::ShellState,
    ui::{self, ApiBadge},
};

pub type Hits = Arc<Mutex<Vec<String>>>;

/// In-process notes service that records every request it sees
pub struct MockService {
    pub base: String,
    pub hits: Hits,
}

#[allow(dead_code)]
impl MockService {
    pub async fn start(routes: Router) -> Self {
        let hits = Hits::default();
        let router = routes
            .fallback(|| async { (StatusCode::NOT_FOUND, "Not Found") })
            .layer(middleware::from_fn_with_state(hits.clone(), record));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind mock service");
        let addr = listener.local_addr().expect("mock service has no address");

        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("mock service stopped");
        });

        Self {
            base: format!("http://{addr}"),
            hits,
        }
    }

    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }
}

async fn record(State(hits): State<Hits>, request: Request, next: Next) -> Response {
    hits.lock()
        .unwrap()
        .push(format!("{} {}", request.method(), request.uri().path()));
    next.run(request).await
}

/// Renders the full screen and counts note cards by their rounded corners
#[allow(dead_code)]
pub fn rendered_cards(state: &ShellState) -> usize {
    let badge = ApiBadge {
        base: "http://notes.test".to_string(),
        custom: true,
    };
    let mut terminal = Terminal::new(TestBackend::new(100, 80)).unwrap();
    terminal
        .draw(|frame| ui::draw_app(frame, state, &badge))
        .unwrap();

    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .filter(|cell| cell.symbol() == "╭")
        .count()
}
