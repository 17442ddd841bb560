// SPDX-FileCopyrightText: 2025 Maciej Borzecki <maciek.borzecki@gmail.com>
//
// SPDX-License-Identifier: MIT

use crate::revision::RevisionDescriptor;

/// Settings of the generated version holder.
#[derive(Debug, Clone, PartialEq)]
pub struct Template<'a> {
    pub package: &'a str,
    pub class: &'a str,
    pub product_version: &'a str,
    pub marker: &'a str,
}

impl<'a> Template<'a> {
    /// Label embedded in the generated constant, eg. `0.6.5-devel-abc12345`.
    pub fn version_label(&self, desc: &RevisionDescriptor) -> String {
        format!("{}-{}-{}", self.product_version, self.marker, desc)
    }

    /// Render the complete file content for a given revision.
    pub fn render(&self, desc: &RevisionDescriptor) -> String {
        format!(
            "package {};\n\
             public final class {} {{\n\
             \x20   public static final String version = \"{}\";\n\
             }}\n",
            self.package,
            self.class,
            self.version_label(desc)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NEOTEXTURE: Template<'static> = Template {
        package: "com.mystictri.neotexture",
        class: "TextureVersion",
        product_version: "0.6.5",
        marker: "devel",
    };

    #[test]
    fn test_render() {
        assert_eq!(
            NEOTEXTURE.render(&RevisionDescriptor::new("abc12345")),
            r#"package com.mystictri.neotexture;
public final class TextureVersion {
    public static final String version = "0.6.5-devel-abc12345";
}
"#
        );
    }

    #[test]
    fn test_render_empty_descriptor() {
        let out = NEOTEXTURE.render(&RevisionDescriptor::new(""));
        assert!(out.contains("    public static final String version = \"0.6.5-devel-\";\n"));
    }

    #[test]
    fn test_render_custom() {
        let t = Template {
            package: "org.example",
            class: "Version",
            product_version: "1.2.0",
            marker: "rc",
        };
        let out = t.render(&RevisionDescriptor::new("v1.2.0-4-g0123abcd"));
        assert!(out.starts_with("package org.example;\npublic final class Version {\n"));
        assert!(out.contains("\"1.2.0-rc-v1.2.0-4-g0123abcd\""));
    }
}
