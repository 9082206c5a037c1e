// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod settings;
pub mod session;
pub mod sync;
pub mod audit;
pub mod products;
pub mod dashboard;
pub mod forecast;
pub mod exporter;
pub mod doctor;
