use crate::zone::Zone;
use crossbeam_channel::Sender;
use ldlidar_data::{ZoneEvent, ZoneState, ZoneTransition};
use log::{info, warn};

/// Hardware side of the guard. Called only when a zone changes state.
pub trait ActuatorDriver {
    fn set_zone_output(&mut self, zone: usize, active: bool);
}

impl<A: ActuatorDriver + ?Sized> ActuatorDriver for Box<A> {
    fn set_zone_output(&mut self, zone: usize, active: bool) {
        (**self).set_zone_output(zone, active)
    }
}

/// Two-state machine driven by one detection flag per cycle.
pub trait ZoneStateMachine {
    fn observe(&mut self, object_detected: bool) -> Option<ZoneEvent>;
}

impl ZoneStateMachine for ZoneState {
    fn observe(&mut self, object_detected: bool) -> Option<ZoneEvent> {
        if object_detected == self.is_active() {
            return None;
        }
        let event = match object_detected {
            true => ZoneEvent::Activated,
            false => ZoneEvent::Deactivated,
        };
        *self = event.target_state();
        Some(event)
    }
}

fn apply(
    index: usize,
    zone: &Zone,
    event: ZoneEvent,
    driver: &mut dyn ActuatorDriver,
) -> ZoneTransition {
    driver.set_zone_output(index, event == ZoneEvent::Activated);
    ZoneTransition {
        zone: index,
        name: zone.name().to_string(),
        event,
    }
}

/// Evaluates every zone once and drives the outputs of those that changed.
pub fn actuate(zones: &mut [Zone], driver: &mut dyn ActuatorDriver) -> Vec<ZoneTransition> {
    let mut transitions = Vec::new();
    for (index, zone) in zones.iter_mut().enumerate() {
        let detected = zone.object_detected();
        if let Some(event) = zone.state_mut().observe(detected) {
            transitions.push(apply(index, zone, event, driver));
        }
    }
    transitions
}

/// Drives every active zone to inactive.
pub fn deactivate_all(zones: &mut [Zone], driver: &mut dyn ActuatorDriver) -> Vec<ZoneTransition> {
    let mut transitions = Vec::new();
    for (index, zone) in zones.iter_mut().enumerate() {
        if let Some(event) = zone.state_mut().observe(false) {
            transitions.push(apply(index, zone, event, driver));
        }
    }
    transitions
}

/// Reports zone outputs through the log.
#[derive(Clone, Debug, Default)]
pub struct LogActuator {
    names: Vec<String>,
}

impl LogActuator {
    pub fn new(zones: &[Zone]) -> LogActuator {
        LogActuator {
            names: zones.iter().map(|z| z.name().to_string()).collect(),
        }
    }

    fn name(&self, zone: usize) -> String {
        match self.names.get(zone) {
            Some(name) => name.clone(),
            None => format!("#{}", zone),
        }
    }
}

impl ActuatorDriver for LogActuator {
    fn set_zone_output(&mut self, zone: usize, active: bool) {
        match active {
            true => warn!("Object too close in zone {}", self.name(zone)),
            false => info!("Zone {} clear", self.name(zone)),
        }
    }
}

/// Forwards zone outputs to another thread.
pub struct ChannelActuator {
    tx: Sender<(usize, bool)>,
}

impl ChannelActuator {
    pub fn new(tx: Sender<(usize, bool)>) -> ChannelActuator {
        ChannelActuator { tx }
    }
}

impl ActuatorDriver for ChannelActuator {
    fn set_zone_output(&mut self, zone: usize, active: bool) {
        if let Err(e) = self.tx.send((zone, active)) {
            warn!("Dropping output for zone {}: {}", zone, e);
        }
    }
}
