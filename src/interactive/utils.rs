use std::fmt;
use std::str::FromStr;

/// Prompts for a secret until it parses.
pub fn prompt_secret_handle_errors<T>(prompt: &str) -> eyre::Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: fmt::Display,
{
    loop {
        let t = inquire::Password::new(prompt)
            .without_confirmation()
            .prompt()?;

        match t.trim().parse() {
            Ok(t) => return Ok(t),
            Err(e) => {
                println!("Error: {}", e);
                continue;
            }
        }
    }
}
