//! Bodies of the reserved blobs: header, command, sprite deletion and
//! touch. Writers emit the type byte; readers expect it already consumed.

use log::warn;

use tableau_serde::{DataBuffer, Serde};

use crate::{
    blob::{error::BlobError, kind::BlobType},
    command::Command,
    touch::{read_list, write_list, TouchEvent},
    types::{SpriteId, TERMINATOR},
};

/// `[HEADER][T]`, sent first in every server frame
pub fn write_header(buffer: &mut DataBuffer, blob_type: BlobType) {
    buffer.add(&blob_type);
    buffer.add(&TERMINATOR);
}

pub fn read_header(buffer: &mut DataBuffer) -> Result<(), BlobError> {
    expect_terminator(buffer, "Header")
}

/// `[COMMAND][code]*[T]`
pub fn write_commands(buffer: &mut DataBuffer, blob_type: BlobType, commands: &[Command]) {
    buffer.add(&blob_type);
    for command in commands {
        buffer.add(&command.code());
    }
    buffer.add(&TERMINATOR);
}

/// Unknown codes are skipped with a warning; each code is a single byte so
/// the rest of the blob stays readable.
pub fn read_commands(buffer: &mut DataBuffer) -> Result<Vec<Command>, BlobError> {
    let mut commands = Vec::new();
    loop {
        let code = u8::de(buffer)?;
        if code == TERMINATOR {
            return Ok(commands);
        }
        match Command::from_code(code) {
            Some(command) => commands.push(command),
            None => warn!("Skipping unknown command code {code}"),
        }
    }
}

/// `[DELETE][count u32][id u32]*[T]`
pub fn write_deleted_sprites(buffer: &mut DataBuffer, blob_type: BlobType, ids: &[SpriteId]) {
    buffer.add(&blob_type);
    let count = u32::try_from(ids.len()).unwrap_or(u32::MAX);
    buffer.add(&count);
    for id in ids.iter().take(count as usize) {
        buffer.add(id);
    }
    buffer.add(&TERMINATOR);
}

pub fn read_deleted_sprites(buffer: &mut DataBuffer) -> Result<Vec<SpriteId>, BlobError> {
    let count = u32::de(buffer)?;
    // every id takes four bytes, so a huge count in a short frame fails fast
    let mut ids = Vec::with_capacity((count as usize).min(buffer.remaining() / 4));
    for _ in 0..count {
        ids.push(SpriteId::de(buffer)?);
    }
    expect_terminator(buffer, "DeleteSprites")?;
    Ok(ids)
}

/// `[TOUCH][count u16]{phase, finger, point}*[T]`
pub fn write_touches(buffer: &mut DataBuffer, blob_type: BlobType, touches: &[TouchEvent]) {
    buffer.add(&blob_type);
    write_list(buffer, touches);
    buffer.add(&TERMINATOR);
}

pub fn read_touches(buffer: &mut DataBuffer) -> Result<Vec<TouchEvent>, BlobError> {
    let touches = read_list::<TouchEvent>(buffer)?;
    expect_terminator(buffer, "Touch")?;
    Ok(touches)
}

fn expect_terminator(buffer: &mut DataBuffer, blob: &'static str) -> Result<(), BlobError> {
    let found = u8::de(buffer)?;
    if found != TERMINATOR {
        return Err(BlobError::MissingTerminator { blob, found });
    }
    Ok(())
}
