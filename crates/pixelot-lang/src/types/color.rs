/// The fixed palette scripts can name. Lookup is case-insensitive and the
/// set is closed — an unrecognized name is a runtime error at the call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Blue,
    Green,
    Yellow,
    Orange,
    Purple,
    Black,
    White,
    Transparent,
    Pink,
    Brown,
    Gray,
    Violet,
    LightBlue,
    DarkBlue,
}

impl Color {
    /// Case-insensitive name lookup. `gray`/`grey` are the same color and the
    /// two-word names accept both hyphenated and fused spellings.
    pub fn parse(name: &str) -> Option<Color> {
        match name.to_ascii_lowercase().as_str() {
            "red" => Some(Self::Red),
            "blue" => Some(Self::Blue),
            "green" => Some(Self::Green),
            "yellow" => Some(Self::Yellow),
            "orange" => Some(Self::Orange),
            "purple" => Some(Self::Purple),
            "black" => Some(Self::Black),
            "white" => Some(Self::White),
            "transparent" => Some(Self::Transparent),
            "pink" => Some(Self::Pink),
            "brown" => Some(Self::Brown),
            "gray" | "grey" => Some(Self::Gray),
            "violet" => Some(Self::Violet),
            "light-blue" | "lightblue" => Some(Self::LightBlue),
            "dark-blue" | "darkblue" => Some(Self::DarkBlue),
            _ => None,
        }
    }

    /// Canonical spelling, as reported back to hosts and in messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Red => "Red",
            Self::Blue => "Blue",
            Self::Green => "Green",
            Self::Yellow => "Yellow",
            Self::Orange => "Orange",
            Self::Purple => "Purple",
            Self::Black => "Black",
            Self::White => "White",
            Self::Transparent => "Transparent",
            Self::Pink => "Pink",
            Self::Brown => "Brown",
            Self::Gray => "Gray",
            Self::Violet => "Violet",
            Self::LightBlue => "Light-Blue",
            Self::DarkBlue => "Dark-Blue",
        }
    }

    /// RGBA for hosts that render the grid. Transparent is fully clear.
    pub fn rgba(&self) -> [u8; 4] {
        match self {
            Self::Red => [255, 0, 0, 255],
            Self::Blue => [0, 0, 255, 255],
            Self::Green => [0, 128, 0, 255],
            Self::Yellow => [255, 255, 0, 255],
            Self::Orange => [255, 165, 0, 255],
            Self::Purple => [128, 0, 128, 255],
            Self::Black => [0, 0, 0, 255],
            Self::White => [255, 255, 255, 255],
            Self::Transparent => [0, 0, 0, 0],
            Self::Pink => [255, 192, 203, 255],
            Self::Brown => [165, 42, 42, 255],
            Self::Gray => [128, 128, 128, 255],
            Self::Violet => [238, 130, 238, 255],
            Self::LightBlue => [173, 216, 230, 255],
            Self::DarkBlue => [0, 0, 139, 255],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Color::parse("RED"), Some(Color::Red));
        assert_eq!(Color::parse("Blue"), Some(Color::Blue));
        assert_eq!(Color::parse("transparent"), Some(Color::Transparent));
    }

    #[test]
    fn gray_and_grey_are_one_color() {
        assert_eq!(Color::parse("gray"), Color::parse("grey"));
    }

    #[test]
    fn hyphenated_names() {
        assert_eq!(Color::parse("light-blue"), Some(Color::LightBlue));
        assert_eq!(Color::parse("DarkBlue"), Some(Color::DarkBlue));
    }

    #[test]
    fn unknown_name_rejected() {
        assert_eq!(Color::parse("magenta"), None);
        assert_eq!(Color::parse(""), None);
    }
}
