// Simple color struct, created from an unsigned 32 representing RRGGBBAA

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn from_u32(num: u32) -> Color {
        let r = (num >> 24) as u8;
        let g = (num >> 16) as u8;
        let b = (num >> 8) as u8;
        let a = num as u8;

        Color { r, g, b, a }
    }

    pub fn alpha(&self) -> f64 {
        self.a as f64 / 255.0
    }

    // Canvas and CSS both take colors as strings, alpha is rounded to two places
    pub fn to_css(&self) -> String {
        format!(
            "rgba({}, {}, {}, {:.2})",
            self.r,
            self.g,
            self.b,
            self.alpha()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_channels_from_rrggbbaa() {
        let c = Color::from_u32(0xff450080);
        assert_eq!(c, Color { r: 0xff, g: 0x45, b: 0x00, a: 0x80 });
    }

    #[test]
    fn formats_as_css_rgba() {
        assert_eq!(Color::from_u32(0xff450080).to_css(), "rgba(255, 69, 0, 0.50)");
        assert_eq!(Color::from_u32(0x000000ff).to_css(), "rgba(0, 0, 0, 1.00)");
    }
}
