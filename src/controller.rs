//! The controller owns the derived data and the selection state. Renderers
//! and remote panes only read; every mutation funnels through the validating
//! setters here, and only an applied change fans out.

use crate::messages::{ControllerMessage, PaneAction, PaneEvent};
use crate::state::{DashboardState, EventFilters, ViewKind};
use crate::DashboardData;
use log::{debug, info, warn};

/// An in-process chart renderer. Implementations draw from the data and the
/// current selection; they never mutate either.
pub trait Renderer {
    fn name(&self) -> &str;
    fn render(&mut self, data: &DashboardData, state: &DashboardState);
}

/// Outbound channel to an isolated rendering pane. Posting is fire-and-forget
/// with at-most-once delivery.
pub trait MessagePort {
    fn post(&mut self, message: &ControllerMessage);
}

struct Pane {
    name: String,
    port: Box<dyn MessagePort>,
    ready: bool,
}

pub struct DashboardController {
    data: DashboardData,
    state: DashboardState,
    renderers: Vec<Box<dyn Renderer>>,
    panes: Vec<Pane>,
}

impl DashboardController {
    pub fn new(data: DashboardData) -> Self {
        let years = data.budget.years();
        let categories = data.series.keys().cloned().collect();
        let state = DashboardState::new(years, categories);

        Self {
            data,
            state,
            renderers: Vec::new(),
            panes: Vec::new(),
        }
    }

    pub fn data(&self) -> &DashboardData {
        &self.data
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Registers a renderer at the end of the notification order and draws it
    /// once with the current snapshot.
    pub fn register_renderer(&mut self, mut renderer: Box<dyn Renderer>) {
        info!("Registering renderer '{}'", renderer.name());
        renderer.render(&self.data, &self.state);
        self.renderers.push(renderer);
    }

    /// Attaches a remote pane. Nothing is sent until the pane reports ready;
    /// a message posted into a still-loading pane would simply be lost.
    pub fn attach_pane(&mut self, name: &str, port: Box<dyn MessagePort>) {
        info!("Attaching pane '{}'", name);
        self.panes.push(Pane {
            name: name.to_string(),
            port,
            ready: false,
        });
    }

    /// Handles the pane's ready signal: marks it live and re-sends the full
    /// current selection so the pane does not depend on having seen any
    /// earlier message.
    pub fn pane_ready(&mut self, name: &str) {
        let Some(pane) = self.panes.iter_mut().find(|p| p.name == name) else {
            warn!("Ready signal from unknown pane '{}'", name);
            return;
        };
        pane.ready = true;

        let (begin, end) = self.state.selected_year_range();
        let snapshot = [
            ControllerMessage::UpdateVisualization {
                view: self.state.active_view(),
            },
            ControllerMessage::UpdateYear {
                year: self.state.selected_year(),
            },
            ControllerMessage::UpdateCategory {
                category: self.state.selected_category().to_string(),
            },
            ControllerMessage::UpdateSpendingChange {
                begin_year: begin,
                end_year: end,
            },
        ];
        for message in &snapshot {
            pane.port.post(message);
        }
        debug!("Replayed current state to pane '{}'", name);
    }

    pub fn select_view(&mut self, view: ViewKind) -> bool {
        if !self.state.set_active_view(view) {
            return false;
        }
        self.broadcast(&ControllerMessage::UpdateVisualization { view });
        self.notify_renderers();
        true
    }

    pub fn select_year(&mut self, year: u16) -> bool {
        if !self.state.set_selected_year(year) {
            return false;
        }
        self.broadcast(&ControllerMessage::UpdateYear { year });
        self.notify_renderers();
        true
    }

    pub fn select_category(&mut self, category: &str) -> bool {
        if !self.state.set_selected_category(category) {
            return false;
        }
        self.broadcast(&ControllerMessage::UpdateCategory {
            category: category.to_string(),
        });
        self.notify_renderers();
        true
    }

    pub fn select_year_range(&mut self, begin: u16, end: u16) -> bool {
        if !self.state.set_year_range(begin, end) {
            return false;
        }
        self.broadcast(&ControllerMessage::UpdateSpendingChange {
            begin_year: begin,
            end_year: end,
        });
        self.notify_renderers();
        true
    }

    pub fn select_event_filters(&mut self, filters: EventFilters) -> bool {
        if !self.state.set_event_filters(filters) {
            return false;
        }
        self.notify_renderers();
        true
    }

    /// Routes an event reported by a pane through the validating setters.
    pub fn handle_event(&mut self, event: PaneEvent) {
        let PaneEvent::VisualizationEvent(action) = event;
        debug!("Pane event: {:?}", action);
        match action {
            PaneAction::CategorySelected { category } => {
                self.select_category(&category);
            }
            PaneAction::YearSelected { year } => {
                self.select_year(year);
            }
            PaneAction::ViewSelected { view } => {
                self.select_view(view);
            }
            PaneAction::Ready { pane } => {
                self.pane_ready(&pane);
            }
        }
    }

    fn notify_renderers(&mut self) {
        for renderer in &mut self.renderers {
            renderer.render(&self.data, &self.state);
        }
    }

    fn broadcast(&mut self, message: &ControllerMessage) {
        for pane in &mut self.panes {
            if pane.ready {
                pane.port.post(message);
            } else {
                debug!("Dropping message for pane '{}': not ready", pane.name);
            }
        }
    }
}
