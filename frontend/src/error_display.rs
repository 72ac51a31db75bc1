use zoon::*;

pub fn error_text(message: &str) -> String {
    format!("Error: {}", message.trim())
}

/// Technical details go to the browser console only.
pub fn log_error_console_only(context: &str, error: &str) {
    zoon::println!("{context}: {error}");
}

/// Replaces the whole app once the inventory can't be loaded.
pub fn error_screen(message: &str) -> impl Element + use<> {
    El::new()
        .s(Width::fill())
        .s(Height::screen())
        .s(Padding::all(24))
        .child(
            El::new()
                .s(Align::center())
                .s(Padding::new().x(20).y(14))
                .s(RoundedCorners::all(8))
                .s(Background::new().color("oklch(95% 0.05 30)"))
                .s(Borders::all(Border::new().width(1).color("oklch(60% 0.2 30)")))
                .s(Font::new().size(16).color("oklch(45% 0.2 30)"))
                .child(error_text(message)),
        )
}
