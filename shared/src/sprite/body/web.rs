use tableau_serde::{DataBuffer, Serde, SerdeErr};

use crate::{
    sprite::{dirty::DirtyState, writer::AttributeWriter},
    touch::{read_list, write_list, KeyEvent, TouchEvent},
    types::AttributeId,
};

pub(crate) const URL_DIRTY: DirtyState = DirtyState::INTERNAL_A;
pub(crate) const TOUCH_EVENTS_DIRTY: DirtyState = DirtyState::INTERNAL_B;
pub(crate) const KEY_EVENTS_DIRTY: DirtyState = DirtyState::INTERNAL_C;

pub const URL_ATT: AttributeId = 80;
pub const TOUCH_EVENTS_ATT: AttributeId = 81;
pub const KEY_EVENTS_ATT: AttributeId = 82;

/// An embedded browser view.
///
/// Input aimed at the page is queued on the server and forwarded to the
/// browser living in each client. Queues are drained once written, so each
/// event crosses the wire exactly once.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Web {
    url: String,
    touch_events: Vec<TouchEvent>,
    key_events: Vec<KeyEvent>,
}

impl Web {
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Touches waiting to be delivered, in sprite-local coordinates
    pub fn pending_touch_events(&self) -> &[TouchEvent] {
        &self.touch_events
    }

    pub fn pending_key_events(&self) -> &[KeyEvent] {
        &self.key_events
    }

    /// Hand queued touches to the browser backend
    pub fn take_touch_events(&mut self) -> Vec<TouchEvent> {
        std::mem::take(&mut self.touch_events)
    }

    pub fn take_key_events(&mut self) -> Vec<KeyEvent> {
        std::mem::take(&mut self.key_events)
    }

    pub(crate) fn set_url(&mut self, url: &str) -> DirtyState {
        if self.url == url {
            return DirtyState::EMPTY;
        }
        self.url = url.to_string();
        URL_DIRTY
    }

    pub(crate) fn push_touch_event(&mut self, event: TouchEvent) -> DirtyState {
        self.touch_events.push(event);
        TOUCH_EVENTS_DIRTY
    }

    pub(crate) fn push_key_event(&mut self, event: KeyEvent) -> DirtyState {
        self.key_events.push(event);
        KEY_EVENTS_DIRTY
    }

    pub(crate) fn dirty_slots() -> DirtyState {
        URL_DIRTY | TOUCH_EVENTS_DIRTY | KEY_EVENTS_DIRTY
    }

    pub(crate) fn write_attributes(&self, writer: &mut AttributeWriter) {
        writer.write_group(URL_DIRTY, URL_ATT, |buffer| {
            buffer.add(&self.url);
        });
        writer.write_group(TOUCH_EVENTS_DIRTY, TOUCH_EVENTS_ATT, |buffer| {
            write_list(buffer, &self.touch_events);
        });
        writer.write_group(KEY_EVENTS_DIRTY, KEY_EVENTS_ATT, |buffer| {
            write_list(buffer, &self.key_events);
        });
    }

    pub(crate) fn on_written(&mut self, written: DirtyState) {
        if written.has(TOUCH_EVENTS_DIRTY) {
            let sent = self.touch_events.len().min(usize::from(u16::MAX));
            self.touch_events.drain(..sent);
        }
        if written.has(KEY_EVENTS_DIRTY) {
            let sent = self.key_events.len().min(usize::from(u16::MAX));
            self.key_events.drain(..sent);
        }
    }

    /// Queues still holding events after a write, which must stay dirty
    pub(crate) fn leftover_dirty(&self) -> DirtyState {
        let mut dirty = DirtyState::EMPTY;
        if !self.touch_events.is_empty() {
            dirty.or(TOUCH_EVENTS_DIRTY);
        }
        if !self.key_events.is_empty() {
            dirty.or(KEY_EVENTS_DIRTY);
        }
        dirty
    }

    pub(crate) fn read_attribute(
        &mut self,
        attribute_id: AttributeId,
        buffer: &mut DataBuffer,
    ) -> Result<bool, SerdeErr> {
        match attribute_id {
            URL_ATT => {
                self.url = String::de(buffer)?;
            }
            TOUCH_EVENTS_ATT => {
                let events = read_list::<TouchEvent>(buffer)?;
                self.touch_events.extend(events);
            }
            KEY_EVENTS_ATT => {
                let events = read_list::<KeyEvent>(buffer)?;
                self.key_events.extend(events);
            }
            _ => return Ok(false),
        }
        Ok(true)
    }
}
