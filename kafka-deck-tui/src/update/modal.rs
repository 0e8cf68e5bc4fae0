use std::sync::Arc;

use crate::error::{UiError, UiResult};
use crate::message::ModalMessage;
use crate::model::popup::Submission;
use crate::model::wizard::ConfirmAction;
use crate::model::{App, MainViewModel};

pub fn update(app: &mut App, msg: ModalMessage) {
    if !app.popup.is_active() {
        return;
    }
    match msg {
        ModalMessage::Close => close(app),
        ModalMessage::Confirm => {
            if app.popup.next_step() {
                submit(app);
            }
        }
        ModalMessage::PrevStep => {
            app.popup.prev_step();
        }
        ModalMessage::CycleNext => app.popup.cycle(true),
        ModalMessage::CyclePrev => app.popup.cycle(false),
        ModalMessage::Input(c) => app.popup.input(c),
        ModalMessage::Backspace => app.popup.backspace(),
    }
    app.redraw.mark();
}

/// The one exit path of every modal.
fn close(app: &mut App) {
    let view = app.message_view;
    app.focus = app.popup.close(|panel| view.shows(panel));
}

fn submit(app: &mut App) {
    let main = Arc::clone(&app.main);
    match app.popup.submit_with(|submission| apply(&main, submission)) {
        Ok(()) => close(app),
        // shown inside the form
        Err(UiError::Validation(errors)) => {
            tracing::debug!(%errors, "form has validation errors");
        }
        Err(e) => e.log("submit failed"),
    }
}

fn apply(main: &Arc<MainViewModel>, submission: Submission) -> UiResult<()> {
    match submission {
        Submission::AddBroker(profile) => main.add_broker_profile(profile).map(drop),
        Submission::AddTopic(config) => main.create_topic(config).map(drop),
        Submission::Produce(request) => main.produce_message(request).map(drop),
        Submission::Confirm(ConfirmAction::DeleteTopic(name)) => main.delete_topic(name).map(drop),
        Submission::TopicConfig(config) => main.update_topic_config(config).map(drop),
    }
}
