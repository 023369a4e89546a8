use crate::display::Surface;
use crate::view::Views;

/// bytes per memory dump row
const MEM_PER_ROW: usize = 32;

/// what the memory panel says while the machine is running
const RUNNING_PLACEHOLDER: &str = "Memory only shown on pause.";

/// right-justified lowercase hex, zero-padded to `len` digits; a value
/// wider than `len` keeps its natural width rather than truncating
pub fn to_hex(n: usize, len: usize) -> String {
    format!("{:0width$x}", n, width = len)
}

/// one register per line, `V{index}: 0x{value}`, in index order
pub fn registers_text(registers: &[u8]) -> String {
    registers
        .iter()
        .enumerate()
        .map(|(idx, value)| format!("V{}: 0x{}", to_hex(idx, 2), to_hex(*value as usize, 2)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// memory rows of `MEM_PER_ROW` bytes, each prefixed with its 3-digit
/// starting offset; a trailing partial row still renders
pub fn dump_rows(bytes: &[u8]) -> Vec<String> {
    bytes
        .chunks(MEM_PER_ROW)
        .enumerate()
        .map(|(row, chunk)| {
            let tokens = chunk
                .iter()
                .map(|b| to_hex(*b as usize, 2))
                .collect::<Vec<_>>()
                .join(" ");
            format!("{}: {}", to_hex(row * MEM_PER_ROW, 3), tokens)
        })
        .collect()
}

/// the full paused dump: pc/sp scalars, the stack row, then memory
pub fn memory_text(views: &Views) -> String {
    let mut out = format!(
        "pc: 0x{}  sp: 0x{}\n",
        to_hex(views.pc as usize, 3),
        to_hex(views.sp as usize, 2)
    );
    let stack = views
        .stack
        .iter()
        .map(|b| to_hex(*b as usize, 2))
        .collect::<Vec<_>>()
        .join(" ");
    out.push_str("stack: ");
    out.push_str(&stack);
    out.push_str("\n\n");
    for row in dump_rows(views.memory) {
        out.push_str(&row);
        out.push('\n');
    }
    out
}

pub fn draw_registers(surface: &mut dyn Surface, registers: &[u8]) {
    surface.set_registers(&registers_text(registers));
}

/// A mid-run dump would show memory torn by the current frame's ticks, so
/// the panel only fills in while paused.
pub fn draw_memory(surface: &mut dyn Surface, views: &Views, paused: bool) {
    if paused {
        surface.set_memory(&memory_text(views));
    } else {
        surface.set_memory(RUNNING_PLACEHOLDER);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::DummyMachine;
    use crate::view::Views;

    #[test]
    fn test_to_hex_pads() {
        assert_eq!(to_hex(0, 2), "00");
        assert_eq!(to_hex(255, 2), "ff");
        assert_eq!(to_hex(0x20, 3), "020");
    }

    #[test]
    fn test_to_hex_never_truncates() {
        assert_eq!(to_hex(4096, 3), "1000");
        assert_eq!(to_hex(255, 1), "ff");
    }

    #[test]
    fn test_registers_text_lines_up() {
        let text = registers_text(&[0x00, 0xab, 0x05]);
        assert_eq!(text, "V00: 0x00\nV01: 0xab\nV02: 0x05");
    }

    #[test]
    fn test_register_index_is_hex() {
        let regs = [0u8; 18];
        let text = registers_text(&regs);
        assert!(text.contains("V0f: 0x00"));
        assert!(text.ends_with("V11: 0x00"));
    }

    #[test]
    fn test_dump_rows_offsets_and_shape() {
        let rows = dump_rows(&[0u8; 100]);
        // a 100 byte bank is three full rows plus a partial one
        assert_eq!(rows.len(), 4);
        assert!(rows[0].starts_with("000: "));
        assert!(rows[1].starts_with("020: "));
        assert!(rows[3].starts_with("060: "));
        assert_eq!(rows[0].matches("00").count() - 1, 32);
    }

    #[test]
    fn test_running_dump_is_suppressed() {
        let mut m = DummyMachine::new(2, 2);
        m.buf.iter_mut().for_each(|b| *b = 0xff);
        let mut s = crate::display::DummySurface::new();
        let views = Views::derive(&m).unwrap();
        draw_memory(&mut s, &views, false);
        assert_eq!(s.memory, RUNNING_PLACEHOLDER);
    }

    #[test]
    fn test_paused_dump_shows_memory() {
        let mut m = DummyMachine::new(2, 2);
        let base = m.memory.base;
        m.buf[base] = 0xde;
        let mut s = crate::display::DummySurface::new();
        let views = Views::derive(&m).unwrap();
        draw_memory(&mut s, &views, true);
        assert!(s.memory.starts_with("pc: 0x000  sp: 0x00\n"));
        assert!(s.memory.contains("stack: 00 00 00 00"));
        assert!(s.memory.contains("000: de 00"));
        // 64 bytes of memory fit in two rows
        assert_eq!(s.memory.lines().filter(|l| l.contains(": ")).count(), 2 + 2);
    }
}
