//! `verify` command handler.

use reelcast::{FfmpegEncoder, Reelcast, SetupReport, verify_setup};

/// Run every setup check and print the report.
pub async fn run_verify(app: &Reelcast) -> SetupReport {
    let encoder = FfmpegEncoder::new(&app.config().media);
    let report = verify_setup(app.config(), app.credentials(), &encoder).await;
    print!("{}", report);
    if report.is_ok() {
        println!("Setup OK.");
    } else {
        eprintln!("\nFix the above, then run `reelcast verify` again.");
    }
    report
}
