// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod check;
pub mod draw;
pub mod replay;
