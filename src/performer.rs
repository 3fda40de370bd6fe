//! Translates parser actions into screen operations.
//!
//! Binding is static: every dispatchable event is matched once here onto the
//! screen method that implements it, so nothing is looked up per byte.

use log::{debug, trace};
use periscope_core::Screen;
use periscope_parser::{Action, CsiAction, EscAction, OscAction};

pub(crate) fn perform(screen: &mut Screen, action: Action) {
    match action {
        Action::Draw(text) => screen.draw(&text),
        Action::Control(byte) => control(screen, byte),
        Action::Esc(esc) => esc_dispatch(screen, esc),
        Action::Csi(csi) => csi_dispatch(screen, &csi),
        Action::Osc(osc) => osc_dispatch(screen, osc),
    }
}

fn control(screen: &mut Screen, byte: u8) {
    match byte {
        0x07 => {} // BEL: nothing to ring headlessly
        0x08 => screen.backspace(),
        0x09 => screen.tab(),
        0x0A | 0x0B | 0x0C => screen.linefeed(),
        0x0D => screen.carriage_return(),
        0x0E => screen.shift_out(),
        0x0F => screen.shift_in(),
        _ => trace!("unhandled control 0x{:02X}", byte),
    }
}

fn esc_dispatch(screen: &mut Screen, esc: EscAction) {
    match esc {
        EscAction::SaveCursor => screen.save_cursor(),
        EscAction::RestoreCursor => screen.restore_cursor(),
        EscAction::Index => screen.index(),
        EscAction::ReverseIndex => screen.reverse_index(),
        EscAction::NextLine => screen.linefeed(),
        EscAction::SetTabStop => screen.set_tab_stop(),
        EscAction::Reset => screen.reset(),
        EscAction::AlignmentTest => screen.alignment_display(),
        EscAction::DesignateCharset { slot, code } => screen.define_charset(slot, code),
        EscAction::SelectCoding(code) => screen.select_coding(code),
        EscAction::Unknown(bytes) => debug!("unhandled ESC sequence {:?}", bytes),
    }
}

fn csi_dispatch(screen: &mut Screen, csi: &CsiAction) {
    if csi.marker != 0 {
        match (csi.marker, csi.final_byte) {
            (b'?', b'h') => screen.set_mode(csi.params.as_slice(), true),
            (b'?', b'l') => screen.reset_mode(csi.params.as_slice(), true),
            // A private-marker DA request must stay unanswered.
            _ => debug!(
                "ignoring CSI {} …{}",
                csi.marker as char, csi.final_byte as char
            ),
        }
        return;
    }
    if !csi.intermediates.is_empty() {
        debug!(
            "unhandled CSI with intermediates {:?} final {}",
            csi.intermediates, csi.final_byte as char
        );
        return;
    }

    match csi.final_byte {
        b'A' => screen.cursor_up(csi.param_or_one(0) as usize),
        b'B' | b'e' => screen.cursor_down(csi.param_or_one(0) as usize),
        b'C' | b'a' => screen.cursor_forward(csi.param_or_one(0) as usize),
        b'D' => screen.cursor_back(csi.param_or_one(0) as usize),
        b'E' => screen.cursor_down1(csi.param_or_one(0) as usize),
        b'F' => screen.cursor_up1(csi.param_or_one(0) as usize),
        b'G' | b'`' => screen.cursor_to_column(csi.param_or_one(0) as usize),
        b'H' | b'f' => screen.cursor_position(
            csi.param_or_one(0) as usize,
            csi.param_or_one(1) as usize,
        ),
        b'd' => screen.cursor_to_line(csi.param_or_one(0) as usize),
        // Arguments past the first are accepted but ignored; some `clear`
        // implementations emit `CSI 3 ; 0 J`.
        b'J' => screen.erase_in_display(csi.param(0, 0) as usize),
        b'K' => screen.erase_in_line(csi.param(0, 0) as usize),
        b'L' => screen.insert_lines(csi.param_or_one(0) as usize),
        b'M' => screen.delete_lines(csi.param_or_one(0) as usize),
        b'@' => screen.insert_characters(csi.param_or_one(0) as usize),
        b'P' => screen.delete_characters(csi.param_or_one(0) as usize),
        b'X' => screen.erase_characters(csi.param_or_one(0) as usize),
        b'S' => screen.scroll_up(csi.param_or_one(0) as usize),
        b'T' => screen.scroll_down(csi.param_or_one(0) as usize),
        b'c' => screen.report_device_attributes(csi.param(0, 0) as usize, false),
        b'g' => screen.clear_tab_stop(csi.param(0, 0) as usize),
        b'h' => screen.set_mode(csi.params.as_slice(), false),
        b'l' => screen.reset_mode(csi.params.as_slice(), false),
        b'm' => screen.select_graphic_rendition(csi.params.as_slice()),
        b'n' => screen.report_device_status(csi.param(0, 0) as usize),
        b'r' => screen.set_margins(csi.param(0, 0) as usize, csi.param(1, 0) as usize),
        b's' => screen.save_cursor(),
        b'u' => screen.restore_cursor(),
        _ => debug!(
            "unhandled CSI {:?} final {}",
            csi.params.as_slice(),
            csi.final_byte as char
        ),
    }
}

fn osc_dispatch(screen: &mut Screen, osc: OscAction) {
    match osc {
        OscAction::SetIconAndTitle(text) => {
            screen.set_icon_name(&text);
            screen.set_title(&text);
        }
        OscAction::SetIconName(text) => screen.set_icon_name(&text),
        OscAction::SetTitle(text) => screen.set_title(&text),
        OscAction::ResetPalette => trace!("palette reset has no grid effect"),
        OscAction::Unknown { command, data } => {
            debug!("unhandled OSC {} ({} bytes)", command, data.len());
        }
    }
}
