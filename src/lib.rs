#[macro_export]
macro_rules! debug_log {
	($($arg:tt)*) => {{
		#[cfg(debug_assertions)]
		{
			eprintln!($($arg)*);
		}
	}};
}

pub mod config;
pub mod ignore_rules;
pub mod language;
pub mod model;
pub mod python;
pub mod resolver;
pub mod script;
pub mod vpath;
pub mod vue;
pub mod walker;
