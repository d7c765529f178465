mod avatar;
mod banner;
mod chat_bubble;
mod header;
mod input_bar;
mod loading_indicator;
mod message_list;

pub use avatar::{Avatar, AVATAR_LETTER};
pub use banner::Banner;
pub use chat_bubble::{message_label, ChatBubble};
pub use header::{Header, APP_TITLE};
pub use input_bar::{
    placeholder_text, InputAction, InputBar, PLACEHOLDER_IDLE, PLACEHOLDER_LISTENING,
    PLACEHOLDER_LOADING,
};
pub use loading_indicator::{dot_intensity, LoadingIndicator};
pub use message_list::MessageList;
