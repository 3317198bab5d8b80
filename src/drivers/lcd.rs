//! HD44780 character LCD driver (4-bit parallel, write-only).
//!
//! The display is 8 columns × 2 rows.  Every write goes through a local
//! frame buffer first, so the host build can assert on what would be
//! shown while the bus writes compile down to no-ops.

use crate::drivers::hw_init;
use crate::pins;

const COLS: usize = pins::LCD_COLS as usize;
const ROWS: usize = pins::LCD_ROWS as usize;

// HD44780 instruction set (subset).
const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_MODE_INC: u8 = 0x06;
const CMD_DISPLAY_ON: u8 = 0x0C;
const CMD_FUNCTION_4BIT_2LINE: u8 = 0x28;
const CMD_SET_DDRAM: u8 = 0x80;

/// DDRAM start address of each row.
const ROW_OFFSETS: [u8; 2] = [0x00, 0x40];

#[cfg(target_os = "espidf")]
fn delay_us(us: u32) {
    // SAFETY: busy-wait ROM routine, no shared state.
    unsafe { esp_idf_svc::sys::esp_rom_delay_us(us) };
}

#[cfg(not(target_os = "espidf"))]
fn delay_us(_us: u32) {}

pub struct LcdDriver {
    frame: [[u8; COLS]; ROWS],
    refreshes: u32,
}

impl Default for LcdDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl LcdDriver {
    /// Run the 4-bit power-on initialisation sequence and clear the screen.
    pub fn new() -> Self {
        let mut lcd = Self {
            frame: [[b' '; COLS]; ROWS],
            refreshes: 0,
        };
        hw_init::gpio_write(pins::LCD_RW_GPIO, false);
        hw_init::gpio_write(pins::LCD_RS_GPIO, false);

        // Wake-up: three 8-bit function sets, then switch to 4-bit.
        delay_us(50_000);
        for _ in 0..3 {
            lcd.write_nibble(0x03);
            delay_us(4_500);
        }
        lcd.write_nibble(0x02);

        lcd.command(CMD_FUNCTION_4BIT_2LINE);
        lcd.command(CMD_DISPLAY_ON);
        lcd.command(CMD_ENTRY_MODE_INC);
        lcd.command(CMD_CLEAR);
        delay_us(2_000);
        log::info!("lcd: initialised ({}x{})", COLS, ROWS);
        lcd
    }

    /// Replace both rows.  Each line is padded or cut to the display width.
    pub fn show_lines(&mut self, line0: &str, line1: &str) {
        self.write_row(0, line0);
        self.write_row(1, line1);
        self.refreshes = self.refreshes.wrapping_add(1);
    }

    /// Current content of `row` as text (non-ASCII cells render as `?`).
    pub fn row_text(&self, row: usize) -> heapless::String<COLS> {
        let mut out = heapless::String::new();
        if let Some(cells) = self.frame.get(row) {
            for &b in cells {
                let c = if b.is_ascii() { b as char } else { '?' };
                // Capacity equals the row width.
                let _ = out.push(c);
            }
        }
        out
    }

    /// Number of full-screen updates since power-on.
    pub fn refreshes(&self) -> u32 {
        self.refreshes
    }

    fn write_row(&mut self, row: usize, text: &str) {
        let mut cells = [b' '; COLS];
        for (cell, b) in cells.iter_mut().zip(text.bytes()) {
            *cell = b;
        }
        self.command(CMD_SET_DDRAM | ROW_OFFSETS[row]);
        for &b in &cells {
            self.data(b);
        }
        self.frame[row] = cells;
    }

    fn command(&mut self, byte: u8) {
        hw_init::gpio_write(pins::LCD_RS_GPIO, false);
        self.write_byte(byte);
    }

    fn data(&mut self, byte: u8) {
        hw_init::gpio_write(pins::LCD_RS_GPIO, true);
        self.write_byte(byte);
    }

    fn write_byte(&mut self, byte: u8) {
        self.write_nibble(byte >> 4);
        self.write_nibble(byte & 0x0F);
        delay_us(40);
    }

    fn write_nibble(&mut self, nibble: u8) {
        for (bit, &pin) in pins::LCD_DATA_GPIOS.iter().enumerate() {
            hw_init::gpio_write(pin, nibble & (1 << bit) != 0);
        }
        hw_init::gpio_write(pins::LCD_EN_GPIO, true);
        delay_us(1);
        hw_init::gpio_write(pins::LCD_EN_GPIO, false);
        delay_us(1);
    }
}
