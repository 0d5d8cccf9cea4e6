//! Reusable project fixtures.

use super::TestProject;

pub const TODO_CONFIG: &str = r#"
[entries]
rsc = "./src/framework/entry.rsc.tsx"
ssr = "./src/framework/entry.ssr.tsx"
client = { index = "./src/framework/entry.client.tsx" }
"#;

/// A todo app: server-entry page, a client counter, a server action and a
/// package with `react-server` exports.
pub fn todo_app() -> TestProject {
    let project = TestProject::new();
    project
        .write("stratum.toml", TODO_CONFIG)
        .write(
            "src/framework/entry.rsc.tsx",
            "import { renderToStream } from 'react-server-dom';\nimport { Todos } from '../routes/Todos';\nimport { renderHtml } from './entry.ssr';\n",
        )
        .write(
            "src/framework/entry.ssr.tsx",
            "import { renderToStream } from 'react-server-dom';\n",
        )
        .write(
            "src/framework/entry.client.tsx",
            "import { hydrate } from 'react-server-dom';\nimport { addTodo } from '../actions';\n",
        )
        .write(
            "src/routes/Todos.tsx",
            "\"use server-entry\";\nimport { Counter } from '../components/Counter';\nimport { addTodo } from '../actions';\nexport function Todos() { return null; }\n",
        )
        .write(
            "src/components/Counter.tsx",
            "\"use client\";\nimport { format } from '../lib/format';\nexport function Counter() { return null; }\n",
        )
        .write(
            "src/actions.ts",
            "\"use server\";\nexport async function addTodo(title) { return title; }\n",
        )
        .write("src/lib/format.ts", "export const format = (n) => String(n);\n")
        .write(
            "node_modules/react-server-dom/package.json",
            r#"{
  "name": "react-server-dom",
  "exports": {
    ".": {
      "react-server": "./server.js",
      "browser": "./browser.js",
      "default": "./node.js"
    }
  }
}"#,
        )
        .write("node_modules/react-server-dom/server.js", "export {};\n")
        .write("node_modules/react-server-dom/browser.js", "export {};\n")
        .write("node_modules/react-server-dom/node.js", "export {};\n");
    project
}
