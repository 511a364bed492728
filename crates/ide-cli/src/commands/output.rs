use ide_core::notice::{Notice, NoticeLevel};

/// Prints a notice to stderr so stdout carries only program output.
pub fn print_notice(notice: &Notice) {
    let marker = match notice.level {
        NoticeLevel::Success => "✅",
        NoticeLevel::Warning => "⚠️ ",
        NoticeLevel::Error => "❌",
    };
    eprintln!("{} {}", marker, notice.message);
}

pub fn success(message: impl Into<String>) {
    print_notice(&Notice::success(message));
}
