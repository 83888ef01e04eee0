use std::{env, net::{SocketAddr, ToSocketAddrs as _}, str::FromStr};

use rust_decimal::Decimal;
use sea_orm::ConnectOptions;
use tracing::info;

use crate::{consts::{DEFAULT_BPA_ANNUAL, DEFAULT_TAX_YEAR}, payroll::{Region, TaxConstants}};

pub struct Config {
    pub host_address: SocketAddr,

    pub database_opt: ConnectOptions,

    pub jwt_key: String,

    pub tax_constants: TaxConstants,
}

pub fn load() -> Config {
    Config {
        host_address: load_host_address(),
        database_opt: load_database_opt().into(),
        jwt_key: load_jwt_key(),
        tax_constants: load_tax_constants(),
    }
}

fn load_host_address() -> SocketAddr {
    info!("Loading environment `HOST_ADDRESS`");

    let var = env::var("HOST_ADDRESS").unwrap_or_else(|_| "127.0.0.1:0".to_string());

    var.to_socket_addrs()
        .expect("`HOST_ADDRESS` is not in a valid format").nth(0)
        .expect("unable to resolve host from `HOST_ADDRESS`")
}

fn load_database_opt() -> impl Into<ConnectOptions> {
    info!("Loading environment `DATABASE_URL`");

    env::var("DATABASE_URL").expect("Environment `DATABASE_URL` is required to be set")
}

fn load_jwt_key() -> String {
    info!("Loading environment `JWT_SECRET`");

    env::var("JWT_SECRET").expect("Environment `JWT_SECRET` is required to be set")
}

fn load_tax_constants() -> TaxConstants {
    info!("Loading environment `PAYROLL_TAX_YEAR`, `BPA_ANNUAL_CA`, `BPA_ANNUAL_QC`");

    let tax_year = parse_var("PAYROLL_TAX_YEAR", DEFAULT_TAX_YEAR);
    let bpa_ca = parse_var("BPA_ANNUAL_CA", DEFAULT_BPA_ANNUAL);
    let bpa_qc = parse_var("BPA_ANNUAL_QC", DEFAULT_BPA_ANNUAL);

    tax_constants(tax_year, bpa_ca, bpa_qc)
}

fn tax_constants(tax_year: i32, bpa_ca: Decimal, bpa_qc: Decimal) -> TaxConstants {
    TaxConstants::new(tax_year)
        .with_bpa(tax_year, Region::Ca, bpa_ca)
        .with_bpa(tax_year, Region::Qc, bpa_qc)
}

fn parse_var<T: FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(var) => var.trim().parse()
            .unwrap_or_else(|_| panic!("Environment `{name}` is not in a valid format")),
        Err(_) => default,
    }
}
