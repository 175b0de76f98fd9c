//
//  stash-client
//  interactive/prompt.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Interactive Prompts Module
//!
//! Thin wrappers over the `dialoguer` crate for the two questions this client
//! ever asks: a masked password and a yes/no confirmation.
//!
//! # Example
//!
//! ```no_run
//! use stash_client::interactive::prompt::{prompt_confirm, prompt_password};
//!
//! let password = prompt_password("Stash password for bob").unwrap();
//! if prompt_confirm("Delete repository tools?", false).unwrap() {
//!     println!("deleting");
//! }
//! ```

use anyhow::Result;
use dialoguer::{Confirm, Password};

/// Prompts the user for password input with masked display.
///
/// # Notes
///
/// - Characters are not echoed to the terminal
/// - The password is returned as a plain `String` and is never stored
pub fn prompt_password(message: &str) -> Result<String> {
    let password = Password::new().with_prompt(message).interact()?;
    Ok(password)
}

/// Prompts the user for a yes/no confirmation, with a default answer.
pub fn prompt_confirm(message: &str, default: bool) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(message)
        .default(default)
        .interact()?;
    Ok(confirmed)
}
