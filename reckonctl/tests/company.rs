#[macro_use]
mod common;
use common::prelude::*;

#[test]
fn empty() -> Result<()> {
    let env = Env::new()?;

    cmd!(env, company).failure().stderr(str::contains("Usage:"));

    Ok(())
}

#[test]
fn create_and_list() -> Result<()> {
    let env = Env::new()?;

    cmd!(env, company create Acme).success();
    cmd!(env, company create Globex --currency eur).success();

    cmd!(env, company list)
        .success()
        .stdout(str::contains("Acme"))
        .stdout(str::contains("USD"))
        .stdout(str::contains("Globex"))
        .stdout(str::contains("EUR"));

    Ok(())
}

#[test]
fn create_rejects_duplicate_names() -> Result<()> {
    let env = Env::new()?;

    cmd!(env, company create Acme).success();
    cmd!(env, company create Acme)
        .failure()
        .stderr(str::contains("Conflict with existing data"));

    Ok(())
}

#[test]
fn show_and_default() -> Result<()> {
    let env = Env::new()?;

    cmd!(env, company create Acme).success();

    cmd!(env, company show)
        .failure()
        .stderr(str::contains("Company not provided"));

    cmd!(env, company show --company Missing)
        .failure()
        .stderr(str::contains("Company not found"));

    cmd!(env, company show --company Acme)
        .success()
        .stdout(str::contains("1 | Acme"))
        .stdout(str::contains("Currency: USD"))
        .stdout(str::contains("Plan: standard"));

    cmd!(env, company default --company Acme).success();
    cmd!(env, company default).success().stdout("Acme\n");

    cmd!(env, company show)
        .success()
        .stdout(str::contains("1 | Acme"));

    cmd!(env, company default --reset).success();
    cmd!(env, company default).success().stdout("<not set>\n");

    Ok(())
}

#[test]
fn delete_requires_confirmation() -> Result<()> {
    let env = Env::new()?;

    cmd!(env, company create Acme).success();

    cmd!(env, company delete --company Acme)
        .failure()
        .stderr(str::contains("requires confirmation"));

    raw_cmd!(env)
        .args(["company", "delete", "--company", "Acme", "--confirm"])
        .write_stdin("yes\n")
        .assert()
        .success();

    cmd!(env, company list).success().stdout(str::contains("Acme").not());

    Ok(())
}
