// src/templates.rs
//! Pure renderers from a [`ProjectConfig`] to file contents.
//!
//! Nothing here touches the filesystem. Identical configurations always render
//! byte-identical files, which is what makes the step plan reproducible.

use serde::Serialize;

use crate::config::{ProjectConfig, ProjectType, Variant};
use crate::error::ScaffoldError;

/// A file to be written, relative to the project root (`/`-separated).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSpec {
  pub relative_path: String,
  pub content: String,
}

impl FileSpec {
  fn new(relative_path: impl Into<String>, content: impl Into<String>) -> Self {
    FileSpec {
      relative_path: relative_path.into(),
      content: content.into(),
    }
  }
}

pub const SRC_DIR: &str = "src";
pub const SHADERS_DIR: &str = "src/shaders";
pub const PUBLIC_DIR: &str = "public";

pub fn index_html(config: &ProjectConfig) -> FileSpec {
  let content = format!(
    r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
</head>
<body>
    <script type="module" src="/src/main.{ext}"></script>
</body>
</html>
"#,
    title = config.project_name,
    ext = config.variant.script_extension(),
  );
  FileSpec::new("index.html", content)
}

pub fn stylesheet(config: &ProjectConfig) -> FileSpec {
  let mut content = String::new();
  if config.tailwind {
    content.push_str("@import \"tailwindcss\";\n\n");
  }
  content.push_str(
    r#"body {
    margin: 0;
    padding: 0;
    background-color: #000;
}
"#,
  );
  FileSpec::new("src/styles.css", content)
}

#[derive(Serialize)]
struct PackageManifest<'a> {
  name: &'a str,
  private: bool,
  version: &'a str,
  #[serde(rename = "type")]
  module_type: &'a str,
  scripts: PackageScripts<'a>,
}

#[derive(Serialize)]
struct PackageScripts<'a> {
  dev: &'a str,
  build: &'a str,
  preview: &'a str,
}

pub fn package_json(config: &ProjectConfig) -> Result<FileSpec, ScaffoldError> {
  let build = match config.variant {
    Variant::Plain => "vite build",
    Variant::Typed => "tsc && vite build",
  };
  let manifest = PackageManifest {
    name: config.project_name.as_str(),
    private: true,
    version: "0.0.0",
    module_type: "module",
    scripts: PackageScripts {
      dev: "vite",
      build,
      preview: "vite preview",
    },
  };
  let mut content = serde_json::to_string_pretty(&manifest)?;
  content.push('\n');
  Ok(FileSpec::new("package.json", content))
}

pub fn vite_config(config: &ProjectConfig) -> FileSpec {
  let mut content = String::from("import { defineConfig } from 'vite'\nimport glsl from 'vite-plugin-glsl'\n");
  let plugins = if config.tailwind {
    content.push_str("import tailwindcss from '@tailwindcss/vite'\n");
    "glsl(), tailwindcss()"
  } else {
    "glsl()"
  };
  content.push_str(&format!(
    "\nexport default defineConfig({{\n  plugins: [{plugins}],\n}})\n"
  ));
  FileSpec::new(
    format!("vite.config.{}", config.variant.script_extension()),
    content,
  )
}

/// `function name()` with a `: void` return annotation for typed output.
fn signature(name: &str, variant: Variant) -> String {
  match variant {
    Variant::Plain => format!("function {name}() {{"),
    Variant::Typed => format!("function {name}(): void {{"),
  }
}

pub fn entry_script(config: &ProjectConfig) -> FileSpec {
  let mut out = String::from(
    "import './styles.css'\nimport * as THREE from 'three'\nimport { OrbitControls } from 'three/examples/jsm/controls/OrbitControls.js'\n",
  );

  let (fov, geometry, material, frame) = match config.project_type {
    ProjectType::Basic => (
      45,
      "new THREE.BoxGeometry(1, 1, 1)",
      "new THREE.MeshBasicMaterial({ color: 0x00ff55 })",
      "  mesh.rotation.x += 0.01\n  mesh.rotation.y += 0.01\n",
    ),
    ProjectType::Shaders => {
      out.push_str("import vertexShader from './shaders/vertex.glsl'\n");
      out.push_str("import fragmentShader from './shaders/fragment.glsl'\n");
      (
        25,
        "new THREE.PlaneGeometry(1, 1, 32, 32)",
        r#"new THREE.ShaderMaterial({
  vertexShader,
  fragmentShader,
  uniforms: {
    time: { value: 0 },
  },
  side: THREE.DoubleSide,
})"#,
        "  material.uniforms.time.value = clock.getElapsedTime()\n",
      )
    }
  };

  out.push_str(&format!(
    r#"
const scene = new THREE.Scene()

const camera = new THREE.PerspectiveCamera({fov}, window.innerWidth / window.innerHeight, 0.1, 1000)
camera.position.z = 5

const renderer = new THREE.WebGLRenderer({{ antialias: true, alpha: true }})
renderer.setSize(window.innerWidth, window.innerHeight)
document.body.appendChild(renderer.domElement)

const controls = new OrbitControls(camera, renderer.domElement)
controls.enableDamping = true

const geometry = {geometry}
const material = {material}
const mesh = new THREE.Mesh(geometry, material)
scene.add(mesh)

"#
  ));

  out.push_str(&signature("fit", config.variant));
  out.push_str(
    r#"
  camera.aspect = window.innerWidth / window.innerHeight
  camera.updateProjectionMatrix()
  renderer.setSize(window.innerWidth, window.innerHeight)
  renderer.setPixelRatio(Math.min(window.devicePixelRatio, 2))
}

window.addEventListener('resize', fit)

"#,
  );
  match config.project_type {
    ProjectType::Basic => {}
    // only the shader frame reads it; an unused local fails `tsc` under noUnusedLocals
    ProjectType::Shaders => out.push_str("const clock = new THREE.Clock()\n\n"),
  }

  out.push_str(&signature("animate", config.variant));
  out.push_str("\n  requestAnimationFrame(animate)\n  controls.update()\n");
  out.push_str(frame);
  out.push_str("  renderer.render(scene, camera)\n}\n\nfit()\nanimate()\n");

  FileSpec::new(
    format!("src/main.{}", config.variant.script_extension()),
    out,
  )
}

pub fn vertex_shader() -> FileSpec {
  FileSpec::new(
    "src/shaders/vertex.glsl",
    r#"varying vec2 vUv;
uniform float time;

void main() {
  vec3 pos = position;
  pos.y += sin(time);

  gl_Position = projectionMatrix * modelViewMatrix * vec4(pos, 1.0);

  vUv = uv;
}
"#,
  )
}

pub fn fragment_shader() -> FileSpec {
  FileSpec::new(
    "src/shaders/fragment.glsl",
    r#"varying vec2 vUv;
uniform float time;

void main() {
  gl_FragColor = vec4(vUv, sin(time), 1.0);

  #include <tonemapping_fragment>
  #include <colorspace_fragment>
}
"#,
  )
}

/// Declares the shape of `*.glsl` imports for the type checker.
pub fn glsl_declaration() -> FileSpec {
  FileSpec::new(
    "src/glsl.d.ts",
    "declare module '*.glsl' {\n  const value: string\n  export default value\n}\n",
  )
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TsConfig {
  compiler_options: CompilerOptions,
  include: [&'static str; 1],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CompilerOptions {
  target: &'static str,
  use_define_for_class_fields: bool,
  module: &'static str,
  lib: [&'static str; 3],
  skip_lib_check: bool,
  module_resolution: &'static str,
  allow_importing_ts_extensions: bool,
  isolated_modules: bool,
  module_detection: &'static str,
  no_emit: bool,
  strict: bool,
  no_unused_locals: bool,
  no_unused_parameters: bool,
  no_fallthrough_cases_in_switch: bool,
}

pub fn tsconfig() -> Result<FileSpec, ScaffoldError> {
  let tsconfig = TsConfig {
    compiler_options: CompilerOptions {
      target: "ES2020",
      use_define_for_class_fields: true,
      module: "ESNext",
      lib: ["ES2020", "DOM", "DOM.Iterable"],
      skip_lib_check: true,
      module_resolution: "bundler",
      allow_importing_ts_extensions: true,
      isolated_modules: true,
      module_detection: "force",
      no_emit: true,
      strict: true,
      no_unused_locals: true,
      no_unused_parameters: true,
      no_fallthrough_cases_in_switch: true,
    },
    include: ["src"],
  };
  let mut content = serde_json::to_string_pretty(&tsconfig)?;
  content.push('\n');
  Ok(FileSpec::new("tsconfig.json", content))
}

pub fn gitignore() -> FileSpec {
  FileSpec::new(
    ".gitignore",
    "node_modules\ndist\ndist-ssr\n*.local\n*.log\n.DS_Store\n",
  )
}

/// Every file for `config`, in the order the plan writes them.
#[cfg(test)]
pub fn render_all(config: &ProjectConfig) -> Result<Vec<FileSpec>, ScaffoldError> {
  let mut files = vec![index_html(config), entry_script(config), stylesheet(config)];
  match config.project_type {
    ProjectType::Basic => {}
    ProjectType::Shaders => {
      files.push(vertex_shader());
      files.push(fragment_shader());
    }
  }
  files.push(package_json(config)?);
  match config.variant {
    Variant::Plain => {}
    Variant::Typed => {
      files.push(tsconfig()?);
      files.push(glsl_declaration());
    }
  }
  files.push(vite_config(config));
  files.push(gitignore());
  Ok(files)
}
