//! Birthdays command.

use serde::Serialize;

use schoolcal_core::BirthdayBoard;

use super::{Session, resolve_now};
use crate::cli::BirthdayArgs;
use crate::error::ClientResult;

/// Shown when the `birthdays` table does not exist.
pub const BIRTHDAYS_NOT_PROVISIONED_TEXT: &str = "The birthday list is not set up yet.";

#[derive(Debug, Serialize)]
struct BirthdayDocument<'a> {
    provisioned: bool,
    #[serde(flatten)]
    board: &'a BirthdayBoard,
}

/// Renders the birthday board.
pub async fn run(session: &Session, args: &BirthdayArgs) -> ClientResult<String> {
    let now = resolve_now(args.now);
    let page = session.service.birthdays(&session.request, now).await?;

    if args.json {
        let document = BirthdayDocument {
            provisioned: page.provisioned,
            board: &page.board,
        };
        return Ok(serde_json::to_string_pretty(&document)?);
    }

    if !page.provisioned {
        return Ok(BIRTHDAYS_NOT_PROVISIONED_TEXT.to_string());
    }
    Ok(session.formatter.format_birthdays(&page.board))
}
