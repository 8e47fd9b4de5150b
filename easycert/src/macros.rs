#[macro_export]
macro_rules! easycert_println {
    ($($arg:tt)*) => {
        println!("[easycert] {}", format!($($arg)*))
    };
}

#[macro_export]
macro_rules! easycert_eprintln {
    ($($arg:tt)*) => {
        eprintln!("[easycert] {}", format!($($arg)*))
    };
}

#[macro_export]
macro_rules! step_println {
    ($step:expr, $($arg:tt)*) => {
        println!("[easycert]({}) {}", $step, format!($($arg)*))
    };
}

#[macro_export]
macro_rules! step_eprintln {
    ($step:expr, $($arg:tt)*) => {
        eprintln!("[easycert]({}) {}", $step, format!($($arg)*))
    };
}
