use crate::message::NavigationMessage;
use crate::model::App;

pub fn update(app: &mut App, msg: NavigationMessage) {
    app.focus = match msg {
        NavigationMessage::FocusNext => app.focus.next(),
        NavigationMessage::FocusPrev => app.focus.prev(),
        NavigationMessage::FocusPanel(panel) => panel,
    };
    app.redraw.mark();
}
