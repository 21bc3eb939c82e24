use std::fs;
use std::path::Path;

use stencil::create::{create, list_templates, CreateOptions};
use stencil::error::{Error, Result};
use stencil::hooks::{WriteAction, WriteFile};
use stencil::npm::PackageRegistry;
use stencil::processor::Variables;
use stencil::prompt::Prompter;
use stencil::settings::Template;
use tempfile::TempDir;

struct NoRegistry;

impl PackageRegistry for NoRegistry {
    fn latest_version(&self, _name: &str) -> Result<Option<String>> {
        Ok(None)
    }
}

/// Picks the last template and answers every variable from a fixed map.
struct Scripted(Variables);

impl Prompter for Scripted {
    fn select_template<'t>(&self, templates: &'t [Template]) -> Result<Option<&'t Template>> {
        Ok(templates.last())
    }

    fn collect_variables(&self, template: &Template) -> Result<Variables> {
        Ok(template
            .variables
            .keys()
            .filter_map(|key| self.0.get(key).map(|value| (key.clone(), value.clone())))
            .collect())
    }
}

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn workspace() -> TempDir {
    let root = TempDir::new().unwrap();
    write(&root.path().join("stencil.yml"), "templateDirs:\n  - templates/*\n");
    write(
        &root.path().join("templates/lib/.template.yml"),
        "name: lib\nfolder: pkg\nvariables:\n  pkg: Package name\n",
    );
    write(&root.path().join("templates/lib/src/__pkg__/index.ts"), "export const name = \"__pkg__\";");
    write(&root.path().join("templates/lib/.DS_Store"), "junk");
    write(&root.path().join("templates/web/.template.yml"), "name: web\nvariables:\n  NAME: App name\n");
    write(&root.path().join("templates/web/index.html"), "<title>__NAME__</title>");
    root
}

fn answers(pairs: &[(&str, &str)]) -> Scripted {
    Scripted(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
}

#[test_log::test]
fn test_create_named_template() {
    let root = workspace();
    let out = TempDir::new().unwrap();
    let options = CreateOptions {
        target_dir: out.path().to_path_buf(),
        template_name: Some("lib".to_string()),
        ..CreateOptions::new(root.path())
    };

    let created = create(options, &answers(&[("pkg", "my-lib")]), &NoRegistry).unwrap();

    assert_eq!(created.template, "lib");
    assert_eq!(created.output_dir, out.path().join("my-lib"));
    assert!(!created.installed);
    let index = out.path().join("my-lib/src/my-lib/index.ts");
    assert_eq!(created.files, vec![index.clone()]);
    assert_eq!(fs::read_to_string(index).unwrap(), "export const name = \"my-lib\";");
}

#[test]
fn test_create_selected_template_in_cwd() {
    let root = workspace();
    let created = create(CreateOptions::new(root.path()), &answers(&[("NAME", "site")]), &NoRegistry)
        .unwrap();

    assert_eq!(created.template, "web");
    assert_eq!(
        fs::read_to_string(root.path().join("site/index.html")).unwrap(),
        "<title>site</title>"
    );
}

#[test]
fn test_create_unknown_template() {
    let root = workspace();
    let options = CreateOptions {
        template_name: Some("nope".to_string()),
        ..CreateOptions::new(root.path())
    };

    match create(options, &answers(&[]), &NoRegistry) {
        Err(Error::TemplateNotFoundError { name }) => assert_eq!(name, "nope"),
        other => panic!("Expected TemplateNotFoundError, got {other:?}"),
    }
}

#[test]
fn test_create_without_templates() {
    let root = TempDir::new().unwrap();
    write(&root.path().join("stencil.yml"), "templateDirs: []\n");

    let result = create(CreateOptions::new(root.path()), &answers(&[]), &NoRegistry);
    assert!(matches!(result, Err(Error::NoTemplatesError { .. })));
}

#[test]
fn test_create_without_config() {
    let root = TempDir::new().unwrap();

    let result = create(CreateOptions::new(root.path()), &answers(&[]), &NoRegistry);
    assert!(matches!(result, Err(ref e) if e.is_config_missing()));
}

#[test]
fn test_create_conflict() {
    let root = workspace();
    fs::create_dir_all(root.path().join("site")).unwrap();

    let result = create(CreateOptions::new(root.path()), &answers(&[("NAME", "site")]), &NoRegistry);
    assert!(matches!(result, Err(Error::DestinationConflictError { .. })));
    assert!(!root.path().join("site/index.html").exists());
}

#[test]
fn test_create_with_hook() {
    let root = workspace();
    let hook = |file: &WriteFile<'_>| -> Result<WriteAction> {
        Ok(WriteAction::Path(file.path.with_extension("htm")))
    };
    let options = CreateOptions {
        before_write: Some(&hook),
        ..CreateOptions::new(root.path())
    };

    create(options, &answers(&[("NAME", "site")]), &NoRegistry).unwrap();
    assert!(root.path().join("site/index.htm").exists());
    assert!(!root.path().join("site/index.html").exists());
}

#[test]
fn test_create_skips_install_when_asked() {
    let root = workspace();
    write(
        &root.path().join("templates/web/.template.yml"),
        "name: web\ninstall: true\nvariables:\n  NAME: App name\n",
    );
    let options = CreateOptions { skip_install: true, ..CreateOptions::new(root.path()) };

    let created = create(options, &answers(&[("NAME", "site")]), &NoRegistry).unwrap();
    assert!(!created.installed);
}

#[test]
fn test_list_templates() {
    let root = workspace();

    let summaries = list_templates(None, root.path()).unwrap();
    let rows: Vec<(&str, Option<usize>, &str)> = summaries
        .iter()
        .map(|s| (s.name.as_str(), s.files, s.folder.as_str()))
        .collect();
    assert_eq!(rows, [("lib", Some(1), "pkg"), ("web", Some(1), "NAME")]);
}

#[cfg(unix)]
#[test_log::test]
fn test_broken_symlink_in_one_template() {
    let root = workspace();
    let web = root.path().join("templates/web");
    std::os::unix::fs::symlink("/nonexistent/target", web.join("dangling")).unwrap();

    let summaries = list_templates(None, root.path()).unwrap();
    let names: Vec<&str> = summaries.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["lib", "web"]);
    assert_eq!(summaries[0].files, Some(1));

    let out = TempDir::new().unwrap();
    let options = CreateOptions {
        target_dir: out.path().to_path_buf(),
        template_name: Some("web".to_string()),
        ..CreateOptions::new(root.path())
    };
    let err = create(options, &answers(&[("NAME", "site")]), &NoRegistry).unwrap_err();
    match err {
        Error::ReadError { path, .. } => assert_eq!(path, web.join("dangling")),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!out.path().join("site").exists());
}
