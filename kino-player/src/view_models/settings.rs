use std::sync::Arc;

use kino_core::{Dispatcher, SettingsService};
use kino_model::Theme;
use tokio::sync::watch;

use super::{Projections, UI_CONFLATE, project};

/// The settings panel projection: theme selection and the remaining-time
/// display toggle, both two-way.
pub struct SettingsViewModel {
    settings: Arc<SettingsService>,

    theme_tx: watch::Sender<Theme>,
    remaining_time_tx: watch::Sender<bool>,

    _projections: Projections,
}

impl SettingsViewModel {
    /// # Panics
    ///
    /// Panics when constructed off the UI thread.
    pub fn new(dispatcher: &Dispatcher, settings: Arc<SettingsService>) -> Self {
        dispatcher.assert_ui_thread();

        let theme_tx = watch::Sender::new(*settings.theme().borrow());
        let remaining_time_tx = watch::Sender::new(*settings.remaining_time().borrow());

        let projections = Projections(vec![
            project(
                dispatcher,
                settings.theme(),
                theme_tx.clone(),
                Some(UI_CONFLATE),
                |t| *t,
            ),
            project(
                dispatcher,
                settings.remaining_time(),
                remaining_time_tx.clone(),
                None,
                |v| *v,
            ),
        ]);

        Self {
            settings,
            theme_tx,
            remaining_time_tx,
            _projections: projections,
        }
    }

    /// Every theme the selector offers, in menu order.
    pub fn themes(&self) -> &'static [Theme] {
        &Theme::ALL
    }

    pub fn theme(&self) -> watch::Receiver<Theme> {
        self.theme_tx.subscribe()
    }

    pub fn remaining_time(&self) -> watch::Receiver<bool> {
        self.remaining_time_tx.subscribe()
    }

    pub fn set_theme(&self, theme: Theme) {
        self.settings.set_theme(theme);
    }

    pub fn set_remaining_time(&self, value: bool) {
        self.settings.set_remaining_time(value);
    }
}
