use crate::machine::Machine;

/// Host key codes (ASCII uppercase) to the machine's hex keypad, using the
/// conventional `1234 / QWER / ASDF / ZXCV` layout. Fixed, process-wide.
const KEYMAP: [(u8, u8); 16] = [
    (b'1', 0x1),
    (b'2', 0x2),
    (b'3', 0x3),
    (b'4', 0xc),
    (b'Q', 0x4),
    (b'W', 0x5),
    (b'E', 0x6),
    (b'R', 0xd),
    (b'A', 0x7),
    (b'S', 0x8),
    (b'D', 0x9),
    (b'F', 0xe),
    (b'Z', 0xa),
    (b'X', 0x0),
    (b'C', 0xb),
    (b'V', 0xf),
];

pub fn lookup(host_code: u8) -> Option<u8> {
    KEYMAP
        .iter()
        .find(|(host, _)| *host == host_code)
        .map(|(_, virtual_key)| *virtual_key)
}

/// forward a host key press; unmapped codes are silently ignored
pub fn key_down(machine: &mut dyn Machine, host_code: u8) {
    if let Some(virtual_key) = lookup(host_code) {
        machine.key_press(virtual_key);
    }
}

/// forward a host key release; unmapped codes are silently ignored
pub fn key_up(machine: &mut dyn Machine, host_code: u8) {
    if let Some(virtual_key) = lookup(host_code) {
        machine.key_up(virtual_key);
    }
}
