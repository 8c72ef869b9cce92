//! Bundled sample input, offered by the shells as a starting point.

/// One complete entry using every recognized field.
pub const EXAMPLE_INPUT: &str = "<startl><comment>认知权限总纲</comment><position>Char↑</position><constant>常驻</constant><keyPositif></keyPositif><keyAdverse></keyAdverse><scanDep>0</scanDep><sticky>0</sticky><cooldown>0</cooldown><delay>0</delay><content>Cognition Matrix</content><CN_annotation>维度：总纲</CN_annotation><development>扩展方向</development><endl>";
