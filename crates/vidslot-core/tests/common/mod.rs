// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(dead_code)]
#![allow(clippy::unwrap_used)]

use std::cell::RefCell;
use std::rc::Rc;

use vidslot_core::{
    Compositor, CompositorBuilder, CompositorConfig, CompositorError, CompositorObserver,
};
use vidslot_harness::{MockProbe, MockRenderer, MockSurfaces, MockTransport};
use vidslot_port::{BoxSize, CallEvent, ParamMap, Participant};

pub type TestCompositor = Compositor<MockRenderer, MockTransport, MockSurfaces, MockProbe>;

/// Everything the observer was told.
#[derive(Debug, Default)]
pub struct Events {
    pub starts: u32,
    pub stops: u32,
    pub errors: Vec<String>,
    pub params: Vec<ParamMap>,
}

/// Observer that records into shared state; clones share it.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    events: Rc<RefCell<Events>>,
}

impl RecordingObserver {
    pub fn starts(&self) -> u32 {
        self.events.borrow().starts
    }

    pub fn stops(&self) -> u32 {
        self.events.borrow().stops
    }

    pub fn errors(&self) -> Vec<String> {
        self.events.borrow().errors.clone()
    }

    pub fn params(&self) -> Vec<ParamMap> {
        self.events.borrow().params.clone()
    }
}

impl CompositorObserver for RecordingObserver {
    fn on_start(&mut self) {
        self.events.borrow_mut().starts += 1;
    }

    fn on_stop(&mut self) {
        self.events.borrow_mut().stops += 1;
    }

    fn on_error(&mut self, error: &CompositorError) {
        self.events.borrow_mut().errors.push(error.to_string());
    }

    fn on_params_changed(&mut self, params: &ParamMap) {
        self.events.borrow_mut().params.push(params.clone());
    }
}

/// A compositor wired to mocks, plus handles to inspect them.
pub struct Rig {
    pub compositor: TestCompositor,
    pub renderer: MockRenderer,
    pub probe: MockProbe,
    pub events: RecordingObserver,
}

impl Rig {
    /// Mutate the roster and deliver the resulting event.
    pub fn roster(&mut self, f: impl FnOnce(&mut MockTransport) -> CallEvent) -> bool {
        let Some(transport) = self.compositor.transport_mut() else {
            return false;
        };
        let event = f(transport);
        self.compositor.handle_call_event(&event)
    }

    pub fn surfaces(&self) -> &MockSurfaces {
        self.compositor.surfaces().unwrap()
    }

    pub fn transport(&self) -> &MockTransport {
        self.compositor.transport().unwrap()
    }
}

/// 2:1 target with a 640px short side, in a 1280x640 container: scale 1.0.
pub fn test_config() -> CompositorConfig {
    CompositorConfig {
        aspect_ratio: 2.0,
        logical_short_side: 640,
        ..CompositorConfig::default()
    }
}

pub fn rig_with(config: CompositorConfig, participants: Vec<Participant>) -> Rig {
    rig_parts(config, participants, MockProbe::new())
}

pub fn rig_parts(config: CompositorConfig, participants: Vec<Participant>, probe: MockProbe) -> Rig {
    init_tracing();
    let renderer = MockRenderer::new();
    let events = RecordingObserver::default();
    let compositor = CompositorBuilder::new(config)
        .renderer(renderer.clone())
        .transport(MockTransport::with_participants(participants))
        .surfaces(MockSurfaces::new())
        .probe(probe.clone())
        .observer(events.clone())
        .container(BoxSize::new(1280.0, 640.0))
        .build();
    Rig {
        compositor,
        renderer,
        probe,
        events,
    }
}

pub fn rig(participants: Vec<Participant>) -> Rig {
    rig_with(test_config(), participants)
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
