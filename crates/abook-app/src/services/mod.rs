// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer between the notepad front end and the backend crates.
//
// Each service wraps one or more backend APIs so the front end gets data it
// can display directly.

pub mod app_services;
pub mod data_dir;
