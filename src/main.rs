// Copyright 2025 Lablup Inc. and Jeongkyu Shin
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use clap::Parser;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use esxup::{
    cli::Cli,
    commands::update::{execute_update, UpdateCommandParams},
    ui::OutputFormatter,
    utils::init_logging,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let params = UpdateCommandParams {
        host: cli.host.clone(),
        user: cli.user.clone(),
        port: cli.port,
        strict_mode: cli.strict_host_key_checking,
        plan: cli.plan(),
    };

    // Single error boundary: whatever happens, report it and reach "Done."
    let exit_code = match execute_update(params).await {
        Ok(outcome) => {
            tracing::info!("Run finished: {:?}", outcome);
            println!("{}", OutputFormatter::format_outcome(&outcome));
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::debug!("Run failed: {:?}", e);
            println!("{}", OutputFormatter::format_error(&e));
            ExitCode::FAILURE
        }
    };

    println!("Done.");
    if !cli.no_pause {
        wait_for_enter();
    }

    exit_code
}

fn wait_for_enter() {
    let _ = io::stdout().flush();
    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
}
