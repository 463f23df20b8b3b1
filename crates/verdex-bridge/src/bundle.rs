//! The in-page Bridge bundle.
//!
//! This module holds the single JavaScript payload that gets registered as an
//! on-new-document script (pinned to the isolated world the Injector creates)
//! and evaluated once per frame. It defines `window.__BridgeFactory__`, a
//! process-global factory with a `version` string and a `create(config)`
//! function that returns a fresh Bridge instance.
//!
//! The bundle combines the DOM Analyzer, ARIA Resolver, Snapshot Generator,
//! and Structural Analyzer into one object so a single isolated-world
//! evaluation is enough to make every Bridge method available.

use verdex_js::js;

/// Version string the host compares against `__BridgeFactory__.version`.
///
/// Bump this whenever the bundle's method signatures or result shapes change
/// in a way that would break a host built against an older version.
pub const BRIDGE_VERSION: &str = "1";

/// Source of the Bridge bundle, registered via `Page.addScriptToEvaluateOnNewDocument`.
pub fn bridge_bundle_js() -> &'static str {
    js! {
        (function () {
            const ROLE_VERSION = "1";

            const KNOWN_ROLES = new Set([
                "alert", "alertdialog", "application", "article", "banner", "blockquote",
                "button", "caption", "cell", "checkbox", "code", "columnheader", "combobox",
                "complementary", "contentinfo", "definition", "deletion", "dialog", "directory",
                "document", "emphasis", "feed", "figure", "form", "generic", "grid", "gridcell",
                "group", "heading", "img", "insertion", "link", "list", "listbox", "listitem",
                "log", "main", "mark", "marquee", "math", "meter", "menu", "menubar", "menuitem",
                "menuitemcheckbox", "menuitemradio", "navigation", "none", "note", "option",
                "paragraph", "presentation", "progressbar", "radio", "radiogroup", "region",
                "row", "rowgroup", "rowheader", "scrollbar", "search", "searchbox", "separator",
                "slider", "spinbutton", "status", "strong", "subscript", "superscript", "switch",
                "tab", "table", "tablist", "tabpanel", "term", "textbox", "time", "timer",
                "toolbar", "tooltip", "tree", "treegrid", "treeitem"
            ]);

            const NAME_FROM_CONTENT_ROLES = new Set([
                "button", "cell", "checkbox", "columnheader", "gridcell", "heading", "link",
                "menuitem", "menuitemcheckbox", "menuitemradio", "option", "paragraph", "radio",
                "row", "rowheader", "sectionhead", "switch", "tab", "tooltip", "treeitem", "listitem"
            ]);

            const NAME_PROHIBITED_ROLES = new Set(["generic", "none", "presentation"]);

            const INTERACTIVE_ROLES = new Set([
                "button", "link", "textbox", "checkbox", "radio", "combobox", "listbox",
                "menuitem", "menuitemcheckbox", "menuitemradio", "tab", "switch", "slider",
                "spinbutton", "searchbox", "option"
            ]);

            const INTERACTIVE_TAGS = new Set([
                "A", "BUTTON", "INPUT", "SELECT", "TEXTAREA", "DETAILS"
            ]);

            const HEADING_TAGS = new Set(["H1", "H2", "H3", "H4", "H5", "H6"]);
            const VALUE_HOLDING_INPUT_EXCLUSIONS = new Set([
                "checkbox", "radio", "file", "button", "submit", "reset", "image", "hidden"
            ]);

            const REF_STAMP_KEY = "__verdexRef";

            // ---------------------------------------------------------------
            // DOM Analyzer
            // ---------------------------------------------------------------

            function relevantAttributes(el) {
                const names = ["class", "id", "data-testid", "role", "aria-label"];
                const out = {};
                for (const name of names) {
                    const value = el.getAttribute(name);
                    if (value !== null) {
                        out[name] = value;
                    }
                }
                return out;
            }

            function getAllAttributes(el) {
                const out = {};
                for (const attr of el.attributes) {
                    out[attr.name] = attr.value;
                }
                return out;
            }

            function normalizeText(raw) {
                if (!raw) return "";
                const stripped = raw.replace(/[​-‍﻿­]/g, "");
                return stripped.replace(/\s+/g, " ").trim();
            }

            function meaningfulText(el) {
                const tag = el.tagName;
                if (tag === "H1" || tag === "H2" || tag === "H3" || tag === "H4" || tag === "H5" || tag === "H6"
                    || tag === "BUTTON" || tag === "A" || tag === "LABEL") {
                    return normalizeText(el.textContent);
                }
                return "";
            }

            function siblingIndex(el) {
                let index = 0;
                let node = el;
                while ((node = node.previousElementSibling) !== null) {
                    index++;
                }
                return index;
            }

            function refsContainedWithin(container, elementsMap) {
                const refs = [];
                for (const [ref, info] of elementsMap) {
                    if (info.el !== container && container.contains(info.el)) {
                        refs.push(ref);
                    }
                }
                return refs;
            }

            // ---------------------------------------------------------------
            // ARIA Resolver
            // ---------------------------------------------------------------

            function implicitRole(el) {
                const tag = el.tagName.toLowerCase();
                switch (tag) {
                    case "a": return el.hasAttribute("href") ? "link" : "generic";
                    case "article": return "article";
                    case "aside": return "complementary";
                    case "blockquote": return "blockquote";
                    case "button": return "button";
                    case "caption": return "caption";
                    case "dialog": return "dialog";
                    case "dd": return "definition";
                    case "dt": return "term";
                    case "em": return "emphasis";
                    case "fieldset": return "group";
                    case "figure": return "figure";
                    case "footer": return landmarkUnlessInSectioning(el, "contentinfo");
                    case "form": return "form";
                    case "h1": case "h2": case "h3": case "h4": case "h5": case "h6": return "heading";
                    case "header": return landmarkUnlessInSectioning(el, "banner");
                    case "hr": return "separator";
                    case "img": return el.getAttribute("alt") === "" ? "presentation" : "img";
                    case "input": return implicitInputRole(el);
                    case "li": return "listitem";
                    case "main": return "main";
                    case "math": return "math";
                    case "menu": return "list";
                    case "nav": return "navigation";
                    case "ol": return "list";
                    case "optgroup": return "group";
                    case "option": return "option";
                    case "output": return "status";
                    case "p": return "paragraph";
                    case "progress": return "progressbar";
                    case "section": return el.getAttribute("aria-label") || el.getAttribute("aria-labelledby")
                        ? "region" : "generic";
                    case "select": return el.multiple || (el.size && el.size > 1) ? "listbox" : "combobox";
                    case "strong": return "strong";
                    case "sub": return "subscript";
                    case "sup": return "superscript";
                    case "summary": return "button";
                    case "table": return "table";
                    case "tbody": case "thead": case "tfoot": return "rowgroup";
                    case "td": return closestAncestorRole(el, "table") === "grid" ? "gridcell" : "cell";
                    case "textarea": return "textbox";
                    case "th": {
                        const scope = el.getAttribute("scope");
                        if (scope === "row") return "rowheader";
                        return "columnheader";
                    }
                    case "time": return "time";
                    case "tr": return "row";
                    case "ul": return "list";
                    default: return "generic";
                }
            }

            function landmarkUnlessInSectioning(el, role) {
                if (el.closest("article, aside, main, nav, section")) {
                    return "generic";
                }
                return role;
            }

            function closestAncestorRole(el, tagLower) {
                const ancestor = el.closest(tagLower);
                if (!ancestor) return null;
                return ancestor.getAttribute("role") || implicitRole(ancestor);
            }

            function implicitInputRole(el) {
                const type = (el.getAttribute("type") || "text").toLowerCase();
                switch (type) {
                    case "button": case "submit": case "reset": return "button";
                    case "checkbox": return "checkbox";
                    case "email": case "tel": case "text": case "url": return "textbox";
                    case "image": return "button";
                    case "number": return "spinbutton";
                    case "radio": return "radio";
                    case "range": return "slider";
                    case "search": return "searchbox";
                    default: return "textbox";
                }
            }

            function resolveRole(el) {
                const explicit = el.getAttribute("role");
                if (explicit) {
                    const first = explicit.trim().split(/\s+/)[0];
                    if (KNOWN_ROLES.has(first)) {
                        if (first === "none" || first === "presentation") {
                            if (hasGlobalAriaAttribute(el) || isFocusable(el)) {
                                return implicitRole(el);
                            }
                            return "generic";
                        }
                        return first;
                    }
                }
                return implicitRole(el);
            }

            function hasGlobalAriaAttribute(el) {
                for (const attr of el.attributes) {
                    if (attr.name.startsWith("aria-")) return true;
                }
                return false;
            }

            function isFocusable(el) {
                if (el.tabIndex >= 0) return true;
                return false;
            }

            function dereferenceIds(idList) {
                return idList
                    .split(/\s+/)
                    .map((id) => {
                        const target = document.getElementById(id);
                        return target ? normalizeText(target.textContent) : "";
                    })
                    .filter((text) => text.length > 0)
                    .join(" ");
            }

            function accessibleName(el, role) {
                if (NAME_PROHIBITED_ROLES.has(role)) return "";

                const labelledBy = el.getAttribute("aria-labelledby");
                if (labelledBy) {
                    const resolved = dereferenceIds(labelledBy);
                    if (resolved) return resolved;
                }

                const ariaLabel = el.getAttribute("aria-label");
                if (ariaLabel && ariaLabel.trim()) return ariaLabel.trim();

                const hostLabel = nativeHostLabel(el);
                if (hostLabel) return hostLabel;

                if (NAME_FROM_CONTENT_ROLES.has(role)) {
                    const text = normalizeText(el.textContent);
                    if (text) return text;
                }

                const title = el.getAttribute("title");
                if (title && title.trim()) return title.trim();

                if (el.tagName === "INPUT" || el.tagName === "TEXTAREA") {
                    const placeholder = el.getAttribute("placeholder");
                    if (placeholder) return placeholder;
                }

                return "";
            }

            function nativeHostLabel(el) {
                if (el.tagName === "IMG") {
                    const alt = el.getAttribute("alt");
                    return alt ? alt.trim() : "";
                }
                if (el.tagName === "INPUT" || el.tagName === "TEXTAREA" || el.tagName === "SELECT") {
                    if (el.id) {
                        const label = document.querySelector("label[for=\"" + cssEscape(el.id) + "\"]");
                        if (label) {
                            const text = normalizeText(label.textContent);
                            if (text) return text;
                        }
                    }
                    const wrapping = el.closest("label");
                    if (wrapping) {
                        const clone = wrapping.cloneNode(true);
                        const inner = clone.querySelector("input, textarea, select");
                        if (inner) inner.remove();
                        const text = normalizeText(clone.textContent);
                        if (text) return text;
                    }
                }
                return "";
            }

            function cssEscape(value) {
                if (window.CSS && window.CSS.escape) return window.CSS.escape(value);
                return value.replace(/[^a-zA-Z0-9_-]/g, "\\$&");
            }

            function ariaState(el, role) {
                const state = {};

                const checkableRoles = new Set(["checkbox", "radio", "switch", "menuitemcheckbox", "menuitemradio"]);
                if (checkableRoles.has(role)) {
                    const ariaChecked = el.getAttribute("aria-checked");
                    if (ariaChecked === "true" || ariaChecked === "false" || ariaChecked === "mixed") {
                        state.checked = ariaChecked;
                    } else if (typeof el.checked === "boolean") {
                        state.checked = el.checked ? "true" : "false";
                    }
                }

                if (el.getAttribute("aria-disabled") === "true" || el.disabled) {
                    state.disabled = true;
                }

                const expanded = el.getAttribute("aria-expanded");
                if (expanded === "true") state.expanded = true;
                if (expanded === "false") state.expanded = false;

                const level = el.getAttribute("aria-level");
                if (level) {
                    state.level = parseInt(level, 10);
                } else if (role === "heading" && HEADING_TAGS.has(el.tagName)) {
                    state.level = parseInt(el.tagName.substring(1), 10);
                }

                if (role === "button") {
                    const pressed = el.getAttribute("aria-pressed");
                    if (pressed === "true" || pressed === "false" || pressed === "mixed") {
                        state.pressed = pressed;
                    }
                }

                if (el.getAttribute("aria-selected") === "true") {
                    state.selected = true;
                }

                if (document.activeElement === el) {
                    state.active = true;
                }

                return state;
            }

            function elementProperties(el, role) {
                const props = {};
                if (el.tagName === "A" && el.hasAttribute("href")) {
                    props.url = el.href;
                }
                if (el.tagName === "IMG") {
                    props.src = el.src;
                }
                if (el.tagName === "INPUT") {
                    props.type = el.getAttribute("type") || "text";
                    const autocomplete = el.getAttribute("autocomplete");
                    if (autocomplete) props.autocomplete = autocomplete;
                }
                const placeholder = el.getAttribute("placeholder");
                if (placeholder && (el.tagName === "INPUT" || el.tagName === "TEXTAREA")) {
                    props.placeholder = placeholder;
                }
                return props;
            }

            function isAriaHidden(el) {
                let node = el;
                while (node) {
                    if (node.nodeType === Node.ELEMENT_NODE && node.getAttribute("aria-hidden") === "true") {
                        return true;
                    }
                    node = node.parentElement;
                }
                return false;
            }

            function isVisibleForAria(el) {
                const tag = el.tagName;
                if (tag === "SCRIPT" || tag === "STYLE" || tag === "NOSCRIPT" || tag === "TEMPLATE") {
                    return false;
                }
                if (isAriaHidden(el)) return false;

                const style = window.getComputedStyle(el);
                if (style.display === "none") return false;
                if (style.visibility === "hidden" && !(el.tagName === "OPTION" && el.closest("select"))) {
                    return false;
                }

                const root = el.getRootNode();
                if (root instanceof ShadowRoot) {
                    const assigned = el.assignedSlot !== undefined ? el.assignedSlot : null;
                    if (el.slot && assigned === null && el.parentElement && el.parentElement.shadowRoot !== root) {
                        return false;
                    }
                }

                return true;
            }

            function isInteractive(el, role) {
                const style = window.getComputedStyle(el);
                if (style.pointerEvents === "none") return false;

                if (isFocusable(el)) return true;
                if (INTERACTIVE_ROLES.has(role)) return true;
                if (INTERACTIVE_TAGS.has(el.tagName)) return true;
                return false;
            }

            // ---------------------------------------------------------------
            // Bridge
            // ---------------------------------------------------------------

            class Bridge {
                constructor(config) {
                    config = config || {};
                    this.maxDepth = config.maxDepth > 0 ? config.maxDepth : 4;
                    this.maxSiblings = config.maxSiblings > 0 ? config.maxSiblings : 15;
                    this.maxDescendants = config.maxDescendants > 0 ? config.maxDescendants : 100;
                    this.maxOutlineItems = config.maxOutlineItems > 0 ? config.maxOutlineItems : 6;
                    this.elements = new Map();
                    this.counter = 0;
                }

                // -------------------------------------------------------
                // Snapshot Generator
                // -------------------------------------------------------

                snapshot() {
                    try {
                        this._sweepElementsMap();
                        this.frameCounter = 0;
                        const root = document.body;
                        if (!root) {
                            return { text: "", elementCount: 0 };
                        }
                        const visited = new Set();
                        let tree = this._buildNode(root, true, visited);
                        tree = this._hoistGenerics(tree);
                        const lines = [];
                        if (tree) {
                            for (const child of tree.children) {
                                this._renderNode(child, 0, lines);
                            }
                        }
                        return { text: lines.join("\n"), elementCount: this.elements.size };
                    } catch (err) {
                        return { text: "Error: " + (err && err.message ? err.message : String(err)), elementCount: 0 };
                    }
                }

                _sweepElementsMap() {
                    for (const [ref, info] of this.elements) {
                        if (!info.el.isConnected) {
                            delete info.el[REF_STAMP_KEY];
                            this.elements.delete(ref);
                        }
                    }
                }

                _allChildren(el) {
                    const out = [];
                    if (el.shadowRoot) {
                        for (const child of el.shadowRoot.children) {
                            out.push(child);
                        }
                    }
                    if (el.tagName === "SLOT") {
                        const assigned = el.assignedElements ? el.assignedElements() : [];
                        for (const child of assigned) out.push(child);
                        return out;
                    }
                    for (const child of el.children) {
                        if (child.tagName === "SLOT" && !el.shadowRoot) continue;
                        out.push(child);
                    }
                    const ownsIds = el.getAttribute("aria-owns");
                    if (ownsIds) {
                        for (const id of ownsIds.split(/\s+/)) {
                            const owned = document.getElementById(id);
                            if (owned) out.push(owned);
                        }
                    }
                    return out;
                }

                _buildNode(el, parentVisible, visited) {
                    if (visited.has(el)) return null;
                    visited.add(el);

                    const visible = parentVisible && isVisibleForAria(el);

                    if (el.tagName === "IFRAME") {
                        if (!visible) return null;
                        this.frameCounter += 1;
                        return { frameOrdinal: this.frameCounter, children: [] };
                    }

                    const role = resolveRole(el);
                    const children = [];

                    const before = visible ? pseudoContent(el, "::before") : "";
                    if (before) children.push({ text: before });

                    if (isValueHoldingControl(el)) {
                        if (visible) {
                            const value = el.value !== undefined ? String(el.value) : "";
                            if (value) children.push({ text: value });
                        }
                    } else {
                        for (const child of this._allChildren(el)) {
                            const childNode = this._buildNode(child, visible, visited);
                            if (childNode) children.push(childNode);
                        }
                        for (const textNode of el.childNodes) {
                            if (textNode.nodeType !== Node.TEXT_NODE) continue;
                            if (role === "textbox") continue;
                            if (!visible) continue;
                            const text = normalizeText(textNode.textContent);
                            if (text) children.push({ text });
                        }
                    }

                    const after = visible ? pseudoContent(el, "::after") : "";
                    if (after) children.push({ text: after });

                    if (!visible) {
                        return children.length ? { role: "generic", children } : null;
                    }

                    const name = accessibleName(el, role);
                    const state = ariaState(el, role);
                    const props = elementProperties(el, role);
                    const interactive = isInteractive(el, role);

                    const node = {
                        role,
                        name,
                        state,
                        props,
                        children,
                        el,
                        interactive,
                    };

                    if (interactive) {
                        node.ref = this._assignRef(el, role, name);
                    }

                    return node;
                }

                _assignRef(el, role, name) {
                    const existing = el[REF_STAMP_KEY];
                    if (existing && this.elements.has(existing)) {
                        const info = this.elements.get(existing);
                        info.tag = el.tagName;
                        info.role = role;
                        info.name = name;
                        info.attrs = getAllAttributes(el);
                        return existing;
                    }
                    this.counter += 1;
                    const ref = "e" + this.counter;
                    el[REF_STAMP_KEY] = ref;
                    this.elements.set(ref, {
                        el,
                        tag: el.tagName,
                        role,
                        name,
                        attrs: getAllAttributes(el),
                    });
                    return ref;
                }

                _hoistGenerics(node) {
                    if (!node) return node;
                    node.children = node.children
                        .map((child) => (child.text !== undefined ? child : this._hoistGenerics(child)))
                        .filter((child) => child !== null);

                    if (
                        node.text === undefined &&
                        node.role === "generic" &&
                        !node.name &&
                        !node.ref &&
                        node.children.length === 1 &&
                        node.children[0].text === undefined
                    ) {
                        return node.children[0];
                    }
                    return node;
                }

                _renderNode(node, indent, lines) {
                    const prefix = "  ".repeat(indent) + "- ";
                    if (node.text !== undefined) {
                        lines.push(prefix + "text: " + yamlScalar(node.text));
                        return;
                    }

                    if (node.frameOrdinal !== undefined) {
                        lines.push(prefix + "iframe [frame=f" + node.frameOrdinal + "]");
                        return;
                    }

                    let line = prefix + node.role;
                    if (node.name) {
                        line += " " + yamlScalar(node.name);
                    }
                    line += renderState(node.state);
                    line += renderProps(node.props);
                    if (node.ref) {
                        line += " [ref=" + node.ref + "]";
                    }
                    lines.push(line);

                    for (const child of node.children) {
                        this._renderNode(child, indent + 1, lines);
                    }
                }

                // -------------------------------------------------------
                // Bridge actions
                // -------------------------------------------------------

                _resolve(ref) {
                    const info = this.elements.get(ref);
                    if (!info) {
                        throw new Error(
                            "verdex-bridge-error:" + JSON.stringify({ kind: "ElementNotFound", ref: ref })
                        );
                    }
                    if (!info.el.isConnected) {
                        this.elements.delete(ref);
                        delete info.el[REF_STAMP_KEY];
                        throw new Error(
                            "verdex-bridge-error:" +
                                JSON.stringify({
                                    kind: "StaleElement",
                                    ref: ref,
                                    role: info.role,
                                    name: info.name,
                                })
                        );
                    }
                    return info;
                }

                click(ref) {
                    const info = this._resolve(ref);
                    info.el.click();
                    return { ref, clicked: true };
                }

                type(ref, text) {
                    const info = this._resolve(ref);
                    const el = info.el;
                    el.focus();
                    el.value = text;
                    el.dispatchEvent(new Event("input", { bubbles: true }));
                    el.dispatchEvent(new Event("change", { bubbles: true }));
                    return { ref, typed: true };
                }

                inspect(ref) {
                    const info = this._resolve(ref);
                    const el = info.el;
                    const rect = el.getBoundingClientRect();
                    return {
                        ref,
                        tagName: el.tagName,
                        role: info.role,
                        name: info.name,
                        attributes: getAllAttributes(el),
                        text: normalizeText(el.textContent),
                        visible: rect.width > 0 && rect.height > 0,
                        bounds: { x: rect.x, y: rect.y, width: rect.width, height: rect.height },
                        siblingIndex: siblingIndex(el),
                        parentRef: this._nearestRefAncestor(el),
                    };
                }

                _nearestRefAncestor(el) {
                    let node = el.parentElement;
                    while (node) {
                        const ref = node[REF_STAMP_KEY];
                        if (ref && this.elements.has(ref)) return ref;
                        node = node.parentElement;
                    }
                    return null;
                }

                getAttributes(el) {
                    return getAllAttributes(el);
                }

                // -------------------------------------------------------
                // Structural Analyzer
                // -------------------------------------------------------

                resolve_container(ref) {
                    const info = this._resolve(ref);
                    const ancestors = [];
                    let node = info.el.parentElement;
                    let level = 1;
                    while (node && node !== document.body) {
                        ancestors.push({
                            level,
                            tag: node.tagName,
                            attributes: relevantAttributes(node),
                            childElementCount: node.children.length,
                            refs: refsContainedWithin(node, this.elements),
                        });
                        node = node.parentElement;
                        level += 1;
                    }
                    return { target: ref, ancestors };
                }

                inspect_pattern(ref, ancestorLevel) {
                    const info = this._resolve(ref);
                    let node = info.el;
                    let depth = 0;
                    while (depth < ancestorLevel && node.parentElement && node.parentElement !== document.body) {
                        node = node.parentElement;
                        depth += 1;
                    }
                    const container = node.parentElement;
                    if (!container) {
                        return {
                            ancestorLevel,
                            containerAt: null,
                            targetSiblingIndex: -1,
                            siblings: [],
                            error: "walked past document.body",
                        };
                    }

                    const targetChild = node;
                    const siblings = [];
                    const children = Array.from(container.children);
                    let targetSiblingIndex = -1;
                    for (let i = 0; i < children.length; i++) {
                        const child = children[i];
                        if (child === targetChild) targetSiblingIndex = i;
                        siblings.push({
                            index: i,
                            tag: child.tagName,
                            attributes: relevantAttributes(child),
                            refs: refsContainedWithin(child, this.elements),
                            texts: collectMeaningfulTexts(child),
                            isTargetType: child.tagName === targetChild.tagName,
                            outline: this._outline(child),
                        });
                    }

                    return {
                        ancestorLevel,
                        containerAt: {
                            tag: container.tagName,
                            attributes: relevantAttributes(container),
                        },
                        targetSiblingIndex,
                        siblings,
                    };
                }

                _outline(container) {
                    const selector = "h1, h2, h3, h4, h5, h6, a, label, [data-testid], strong, em, span";
                    const nodes = Array.from(container.querySelectorAll(selector)).slice(0, this.maxOutlineItems);
                    return nodes.map((el) => ({
                        tag: el.tagName,
                        role: resolveRole(el),
                        text: normalizeText(el.textContent).slice(0, 200),
                        testid: el.getAttribute("data-testid") || null,
                    }));
                }

                extract_anchors(ref, ancestorLevel) {
                    const info = this._resolve(ref);
                    let node = info.el;
                    let depth = 0;
                    while (depth < ancestorLevel && node.parentElement && node.parentElement !== document.body) {
                        node = node.parentElement;
                        depth += 1;
                    }
                    if (!node.parentElement && depth < ancestorLevel) {
                        return { ancestorAt: null, descendants: [], totalDescendants: 0, maxDepthReached: 0 };
                    }

                    const descendants = [];
                    let maxDepthReached = 0;
                    let budget = { remaining: this.maxDescendants };

                    const walk = (el, depthLevel, index) => {
                        if (budget.remaining <= 0) return;
                        if (depthLevel > this.maxDepth) return;
                        maxDepthReached = Math.max(maxDepthReached, depthLevel);

                        const ref = el[REF_STAMP_KEY] && this.elements.has(el[REF_STAMP_KEY]) ? el[REF_STAMP_KEY] : null;
                        const directText = directTextOf(el);
                        const fullText = isSemanticTextTag(el.tagName) ? normalizeText(el.textContent).slice(0, 200) : null;

                        descendants.push({
                            depth: depthLevel,
                            index,
                            tag: el.tagName,
                            attributes: relevantAttributes(el),
                            ref,
                            role: ref ? resolveRole(el) : null,
                            name: ref ? accessibleName(el, resolveRole(el)) : null,
                            directText: directText.slice(0, 200),
                            fullText: fullText && fullText !== directText.slice(0, 200) ? fullText : null,
                        });
                        budget.remaining -= 1;

                        const children = Array.from(el.children).slice(0, this.maxSiblings);
                        children.forEach((child, childIndex) => {
                            if (budget.remaining > 0) walk(child, depthLevel + 1, childIndex);
                        });
                    };

                    const children = Array.from(node.children).slice(0, this.maxSiblings);
                    children.forEach((child, index) => walk(child, 1, index));

                    return {
                        ancestorAt: { tag: node.tagName, attributes: relevantAttributes(node) },
                        descendants,
                        totalDescendants: descendants.length,
                        maxDepthReached,
                    };
                }
            }

            function isValueHoldingControl(el) {
                if (el.tagName === "TEXTAREA") return true;
                if (el.tagName !== "INPUT") return false;
                const type = (el.getAttribute("type") || "text").toLowerCase();
                return !VALUE_HOLDING_INPUT_EXCLUSIONS.has(type);
            }

            function pseudoContent(el, pseudo) {
                const style = window.getComputedStyle(el, pseudo);
                const content = style.content;
                if (!content || content === "none" || content === "normal") return "";
                let value = content.trim();
                if (
                    (value.startsWith("\"") && value.endsWith("\"")) ||
                    (value.startsWith("'") && value.endsWith("'"))
                ) {
                    value = value.slice(1, -1);
                }
                value = value.replace(/\\([0-9a-fA-F]{1,6})\s?/g, (_match, hex) =>
                    String.fromCodePoint(parseInt(hex, 16))
                );
                return normalizeText(value);
            }

            function yamlNeedsQuoting(value) {
                if (value === "true" || value === "false" || value === "null" || value === "~") return true;
                if (/^[0-9]/.test(value)) return true;
                return /[:\[\]{}#&*!|>'"%@`\n\r]/.test(value);
            }

            function yamlScalar(value) {
                if (!yamlNeedsQuoting(value)) return value;
                return JSON.stringify(value);
            }

            function renderState(state) {
                if (!state) return "";
                let out = "";
                if (state.checked === "true") out += " [checked]";
                else if (state.checked === "mixed") out += " [checked=mixed]";
                if (state.disabled) out += " [disabled]";
                if (state.expanded) out += " [expanded]";
                if (state.active) out += " [active]";
                if (state.level) out += " [level=" + state.level + "]";
                if (state.pressed === "true") out += " [pressed]";
                else if (state.pressed === "mixed") out += " [pressed=mixed]";
                if (state.selected) out += " [selected]";
                return out;
            }

            function renderProps(props) {
                if (!props) return "";
                const keys = Object.keys(props);
                if (keys.length === 0) return "";
                const parts = keys.map((key) => {
                    const escaped = String(props[key]).replace(/"/g, "\\\"");
                    return key + "=\"" + escaped + "\"";
                });
                return " [" + parts.join(" ") + "]";
            }

            function collectMeaningfulTexts(container) {
                const seen = new Set();
                const out = [];
                const selector = "h1, h2, h3, h4, h5, h6, button, a, label";
                for (const el of container.querySelectorAll(selector)) {
                    const text = meaningfulText(el);
                    if (text.length > 1 && !seen.has(text)) {
                        seen.add(text);
                        out.push(text);
                    }
                }
                return out;
            }

            function directTextOf(el) {
                let text = "";
                for (const node of el.childNodes) {
                    if (node.nodeType === Node.TEXT_NODE) {
                        text += node.textContent;
                    }
                }
                return normalizeText(text);
            }

            function isSemanticTextTag(tag) {
                return (
                    HEADING_TAGS.has(tag) ||
                    tag === "P" ||
                    tag === "SPAN" ||
                    tag === "LABEL" ||
                    tag === "BUTTON" ||
                    tag === "A"
                );
            }

            window.__BridgeFactory__ = {
                version: ROLE_VERSION,
                create(config) {
                    return new Bridge(config);
                },
            };
        })()
    }
}

#[cfg(test)]
mod tests {
    use super::bridge_bundle_js;

    #[test]
    fn bundle_is_non_empty_and_defines_factory() {
        let source = bridge_bundle_js();
        assert!(source.contains("__BridgeFactory__"));
        assert!(source.contains("class Bridge"));
    }
}
