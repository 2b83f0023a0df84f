// Toolbar data: colors, sizes and emoji offered to the user

use crate::config::DEFAULT_FONT_SIZES;

/// Swatches shown by the text and highlight color pickers
pub const COLOR_PALETTE: [&str; 30] = [
    "#000000", "#333333", "#666666", "#999999", "#cccccc", "#ffffff",
    "#ff0000", "#ff6600", "#ffcc00", "#ffff00", "#ccff00", "#66ff00",
    "#00ff00", "#00ff66", "#00ffcc", "#00ffff", "#00ccff", "#0066ff",
    "#0000ff", "#6600ff", "#cc00ff", "#ff00ff", "#ff00cc", "#ff0066",
    "#8b4513", "#a0522d", "#cd853f", "#deb887", "#f4a460", "#d2691e",
];

/// Sizes offered by the font size picker, in px
pub const FONT_SIZES: [u16; 10] = DEFAULT_FONT_SIZES;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmojiCategory {
    pub name: &'static str,
    pub emojis: &'static [&'static str],
}

pub const EMOJI_CATEGORIES: &[EmojiCategory] = &[
    EmojiCategory {
        name: "Smileys",
        emojis: &[
            "😀", "😃", "😄", "😁", "😆", "😅", "🤣", "😂", "🙂", "🙃", "😉", "😊", "😇", "🥰", "😍", "🤩", "😘",
            "😗", "😚", "😙", "😋", "😛", "😜", "🤪", "😝", "🤑", "🤗", "🤭", "🤫", "🤔", "🤐", "🤨", "😐", "😑",
            "😶", "😏", "😒", "🙄", "😬", "🤥", "😌", "😔", "😪", "🤤", "😴", "😷", "🤒", "🤕", "🤢", "🤮", "🤧",
            "🥵", "🥶", "🥴", "😵", "🤯", "🤠", "🥳", "😎", "🤓", "🧐",
        ],
    },
    EmojiCategory {
        name: "Hearts",
        emojis: &[
            "❤️", "🧡", "💛", "💚", "💙", "💜", "🖤", "🤍", "🤎", "💔", "❣️", "💕", "💞", "💓", "💗", "💖", "💘",
            "💝", "💟",
        ],
    },
    EmojiCategory {
        name: "Nature",
        emojis: &[
            "🌸", "🌺", "🌻", "🌷", "🌹", "🥀", "🌾", "🌿", "🍀", "🍃", "🌱", "🌲", "🌳", "🌴", "🌵", "🌶️", "🍄",
            "🌰", "🌼", "🌻",
        ],
    },
    EmojiCategory {
        name: "Food",
        emojis: &[
            "🍎", "🍊", "🍋", "🍌", "🍉", "🍇", "🍓", "🍈", "🍒", "🍑", "🥭", "🍍", "🥥", "🥝", "🍅", "🍆", "🥑",
            "🥦", "🥬", "🥒", "🌶️", "🌽", "🥕", "🧄", "🧅", "🥔", "🍠", "🥐", "🍞", "🥖", "🥨", "🧀", "🥚", "🍳",
            "🧈", "🥞", "🧇", "🥓", "🥩", "🍗", "🍖", "🌭", "🍔", "🍟", "🍕",
        ],
    },
    EmojiCategory {
        name: "Activities",
        emojis: &[
            "⚽", "🏀", "🏈", "⚾", "🥎", "🎾", "🏐", "🏉", "🥏", "🎱", "🪀", "🏓", "🏸", "🏒", "🏑", "🥍", "🏏",
            "🪃", "🥅", "⛳", "🪁", "🏹", "🎣", "🤿", "🥊", "🥋", "🎽", "🛹", "🛷", "⛸️", "🥌", "🎿", "⛷️", "🏂",
            "🪂", "🏋️‍♀️", "🏋️‍♂️", "🤸‍♀️", "🤸‍♂️", "⛹️‍♀️", "⛹️‍♂️", "🤺", "🤾‍♀️", "🤾‍♂️", "🏌️‍♀️",
            "🏌️‍♂️", "🧘‍♀️", "🧘‍♂️", "🏃‍♀️", "🏃‍♂️", "🚶‍♀️", "🚶‍♂️",
        ],
    },
];

/// Categories whose name contains `query`, ignoring case. An empty query matches all.
pub fn search_emoji(query: &str) -> Vec<&'static EmojiCategory> {
    let query = query.trim().to_lowercase();
    EMOJI_CATEGORIES
        .iter()
        .filter(|category| category.name.to_lowercase().contains(&query))
        .collect()
}
