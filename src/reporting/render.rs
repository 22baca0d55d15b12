//! Localized text for report headers and entries.

use super::builder::ReportEntry;
use super::resolver::Scope;
use crate::i18n::Localizer;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Header line naming what the report is about.
pub fn render_header(localizer: &Localizer, scope: &Scope) -> String {
    match scope {
        Scope::Channel { name, .. } => {
            localizer.lookup("report_on_channel_head", &[("channel", name.as_str())])
        }
        Scope::User { display_name } => {
            localizer.lookup("report_on_user_head", &[("user", display_name.as_str())])
        }
        Scope::ChannelAndUser {
            channel_name,
            display_name,
        } => localizer.lookup(
            "report_on_channel_and_user_head",
            &[("channel", channel_name.as_str()), ("user", display_name.as_str())],
        ),
    }
}

/// Text body for `entries`. An empty sequence renders as the "no data"
/// message and nothing else.
pub fn render_entries(localizer: &Localizer, scope: &Scope, entries: &[ReportEntry]) -> String {
    if entries.is_empty() {
        return localizer.lookup("report_no_data", &[]);
    }

    let multi_channel = scope.is_multi_channel();
    let mut report = String::new();
    for entry in entries {
        let from = entry.date_from.format(DATE_FORMAT).to_string();
        let to = entry.date_to.format(DATE_FORMAT).to_string();
        report += &localizer.lookup("report_period", &[("from", from.as_str()), ("to", to.as_str())]);

        for content in &entry.contents {
            if multi_channel {
                report +=
                    &localizer.lookup("report_show_channel", &[("channel", content.channel.as_str())]);
            }
            for standup in &content.reported {
                report += &if multi_channel {
                    localizer.lookup(
                        "report_standup_from_channel",
                        &[
                            ("channel", standup.channel_name.as_str()),
                            ("comment", standup.comment.as_str()),
                        ],
                    )
                } else {
                    localizer.lookup(
                        "report_standup_from_user",
                        &[("user", standup.author_name.as_str()), ("comment", standup.comment.as_str())],
                    )
                };
            }
            for participant in &content.missing {
                report += &localizer.lookup(
                    "report_ignored_standup",
                    &[("user", participant.display_name.as_str())],
                );
            }
            if multi_channel {
                report.push('\n');
            }
        }
    }
    report
}
