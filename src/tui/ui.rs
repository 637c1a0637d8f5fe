use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::core::state::App;
use crate::tui::component::Component;
use crate::tui::components::{
    DocumentDialog, DocumentsTable, MessageList, Sidebar, TitleBar, input_box, sidebar,
};
use crate::tui::{TuiState, View};

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min};
    let [sidebar_area, main_area] =
        Layout::horizontal([Length(sidebar::WIDTH), Min(0)]).areas(frame.area());
    let [title_area, content_area] = Layout::vertical([Length(1), Min(0)]).areas(main_area);

    Sidebar { active: tui.view }.render(frame, sidebar_area);

    let connection = (tui.view == View::Chat).then(|| app.session.is_connected());
    let has_unseen =
        tui.view == View::Chat && tui.message_list.has_unseen(app.session.messages().len());
    TitleBar::new(
        tui.view.title().to_string(),
        connection,
        app.status_message.clone(),
        has_unseen,
    )
    .render(frame, title_area);

    match tui.view {
        View::Chat => draw_chat(frame, content_area, app, tui),
        View::Documents => draw_documents(frame, content_area, app, tui),
    }
}

fn draw_chat(frame: &mut Frame, area: Rect, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min};
    let [list_area, input_area] =
        Layout::vertical([Min(0), Length(input_box::HEIGHT)]).areas(area);

    MessageList::new(&mut tui.message_list, app.session.messages()).render(frame, list_area);

    tui.input_box.connected = app.session.is_connected();
    tui.input_box.render(frame, input_area);
}

fn draw_documents(frame: &mut Frame, area: Rect, app: &App, tui: &mut TuiState) {
    DocumentsTable::new(&mut tui.documents_table, &app.documents).render(frame, area);

    let Some(index) = tui.dialog else {
        return;
    };
    if let Some(document) = app.documents.documents.get(index) {
        DocumentDialog {
            document,
            analyzing: app.documents.is_analyzing(),
            result: app.documents.result_for(index),
        }
        .render(frame, frame.area());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::DocumentsPhase;
    use crate::documents::Document;
    use crate::test_support::test_app;
    use crate::transport::TransportEvent;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn rendered(app: &App, tui: &mut TuiState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| draw_ui(f, app, tui)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_chat_view_shows_log_and_connection() {
        let (mut app, _probe) = test_app();
        app.session.handle_event(TransportEvent::Frame("pong".into()));
        let mut tui = TuiState::new();

        let text = rendered(&app, &mut tui);
        assert!(text.contains("● Connected"));
        assert!(text.contains("pong"));
        assert!(text.contains("Type a message..."));
        assert!(tui.input_box.connected);
    }

    #[test]
    fn test_empty_chat_shows_placeholder() {
        let (app, _probe) = test_app();
        let mut tui = TuiState::new();
        assert!(rendered(&app, &mut tui).contains("Start a conversation..."));
    }

    #[test]
    fn test_documents_view_with_dialog() {
        let (mut app, _probe) = test_app();
        app.documents.phase = DocumentsPhase::Ready;
        app.documents.documents = vec![Document {
            file_name: "sunt_aut_facere.pdf".into(),
            version: "v1.1".into(),
            size: "512 KB".into(),
            upload_date: "03.03.2024".into(),
            description: "quia et suscipit".into(),
        }];
        let mut tui = TuiState::new();
        tui.view = View::Documents;
        tui.dialog = Some(0);

        let text = rendered(&app, &mut tui);
        assert!(text.contains("sunt_aut_facere.pdf"));
        assert!(text.contains("quia et suscipit"));
        assert!(text.contains("[a] Analyze"));
        assert!(!text.contains('●'));
    }
}
