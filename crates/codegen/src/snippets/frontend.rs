//! Admin UI fragments: API client, list page, edit dialog and route entries.

use super::Placement;
use crate::context::{FieldContext, TemplateData};
use crate::generators::{Capabilities, ComponentGenerator, SnippetGenerator};
use crudforge_core::{CodeSnippet, ComponentType, CoreError};

fn view_dir(data: &TemplateData) -> String {
    format!("web/src/views/{}", data.names.kebab)
}

/// TypeScript API client with typings for the model's CRUD endpoints
#[derive(Debug, Clone, Copy, Default)]
pub struct FrontendApiGenerator;

impl ComponentGenerator for FrontendApiGenerator {
    fn component(&self) -> ComponentType {
        ComponentType::FrontendApi
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::SNIPPETS
    }
}

impl SnippetGenerator for FrontendApiGenerator {
    fn generate_snippets(&self, data: &TemplateData) -> Result<Vec<CodeSnippet>, CoreError> {
        let m = &data.names.model;
        let api = &data.names.api_base;

        let mut out = String::new();
        out.push_str("import request from '@/utils/http'\n\n");

        push_line!(out, "/** {} */", data.names.display);
        push_line!(out, "export interface {}Info {{", m);
        out.push_str("  id: number\n");
        for field in &data.fields {
            push_line!(out, "  {}: {}{}", field.ts_name, field.ts_type, ts_comment(field));
        }
        out.push_str("  created_at: string\n  updated_at: string\n}\n\n");

        push_line!(
            out,
            "export interface {m}ListParams {{\n  page?: number\n  page_size?: number\n  [key: string]: unknown\n}}\n",
            m = m
        );
        push_line!(
            out,
            "export interface {m}ListData {{\n  list: {m}Info[]\n  total: number\n  page: number\n  page_size: number\n}}\n",
            m = m
        );

        for (suffix, optional) in [("CreateRequest", ""), ("UpdateRequest", "?")] {
            push_line!(out, "export interface {}{} {{", m, suffix);
            for field in &data.fields {
                push_line!(out, "  {}{}: {}", field.ts_name, optional, field.ts_type);
            }
            out.push_str("}\n\n");
        }

        push_line!(
            out,
            "export function get{m}List(params: {m}ListParams) {{\n  return request.get<{m}ListData>({{ url: '{api}', params }})\n}}\n",
            m = m,
            api = api
        );
        push_line!(
            out,
            "export function get{m}ById(id: number) {{\n  return request.get<{m}Info>({{ url: `{api}/${{id}}` }})\n}}\n",
            m = m,
            api = api
        );
        push_line!(
            out,
            "export function create{m}(data: {m}CreateRequest) {{\n  return request.post<{m}Info>({{ url: '{api}', data }})\n}}\n",
            m = m,
            api = api
        );
        push_line!(
            out,
            "export function update{m}(id: number, data: {m}UpdateRequest) {{\n  return request.put<{m}Info>({{ url: `{api}/${{id}}`, data }})\n}}\n",
            m = m,
            api = api
        );
        out.push_str(&format!(
            "export function delete{m}(id: number) {{\n  return request.del({{ url: `{api}/${{id}}` }})\n}}",
            m = m,
            api = api
        ));

        Ok(vec![Placement {
            category: "frontend_api",
            target_file: format!("web/src/api/{}.ts", data.names.kebab),
            marker: None,
            insertion_point: "new file".to_string(),
            description: format!("API client for {}", data.names.display),
            priority: 1,
        }
        .into_snippet(data, out)])
    }
}

/// List page with search form, table and pagination
#[derive(Debug, Clone, Copy, Default)]
pub struct FrontendPageGenerator;

impl ComponentGenerator for FrontendPageGenerator {
    fn component(&self) -> ComponentType {
        ComponentType::FrontendPage
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::SNIPPETS
    }
}

impl SnippetGenerator for FrontendPageGenerator {
    fn generate_snippets(&self, data: &TemplateData) -> Result<Vec<CodeSnippet>, CoreError> {
        let names = &data.names;
        let searchable: Vec<&FieldContext> = data
            .fields
            .iter()
            .filter(|f| f.is_status || (f.ts_type == "string" && !f.temporal))
            .collect();

        let mut out = String::new();
        out.push_str("<template>\n  <div class=\"page-content\">\n");
        out.push_str("    <el-form :model=\"query\" inline>\n");
        for field in &searchable {
            push_line!(out, "      <el-form-item label=\"{}\">", field.label);
            if field.is_status {
                push_line!(
                    out,
                    "        <el-select v-model=\"query.{}\" clearable>\n          <el-option label=\"Enabled\" :value=\"1\" />\n          <el-option label=\"Disabled\" :value=\"0\" />\n        </el-select>",
                    field.ts_name
                );
            } else {
                push_line!(out, "        <el-input v-model=\"query.{}\" clearable />", field.ts_name);
            }
            out.push_str("      </el-form-item>\n");
        }
        out.push_str("      <el-button type=\"primary\" @click=\"load\">Search</el-button>\n");
        out.push_str("      <el-button @click=\"openDialog()\">Add</el-button>\n");
        out.push_str("    </el-form>\n\n");

        out.push_str("    <el-table :data=\"rows\" v-loading=\"loading\">\n");
        out.push_str("      <el-table-column prop=\"id\" label=\"ID\" width=\"80\" />\n");
        for field in &data.fields {
            if field.is_status {
                push_line!(
                    out,
                    "      <el-table-column prop=\"{key}\" label=\"{label}\">\n        <template #default=\"{{ row }}\">\n          <el-tag :type=\"row.{key} ? 'success' : 'info'\">{{{{ row.{key} ? 'Enabled' : 'Disabled' }}}}</el-tag>\n        </template>\n      </el-table-column>",
                    key = field.ts_name,
                    label = field.label
                );
            } else {
                push_line!(out, "      <el-table-column prop=\"{}\" label=\"{}\" />", field.ts_name, field.label);
            }
        }
        out.push_str("      <el-table-column label=\"Actions\" width=\"160\">\n");
        out.push_str("        <template #default=\"{ row }\">\n");
        out.push_str("          <el-button link @click=\"openDialog(row)\">Edit</el-button>\n");
        out.push_str("          <el-button link type=\"danger\" @click=\"remove(row)\">Delete</el-button>\n");
        out.push_str("        </template>\n      </el-table-column>\n    </el-table>\n\n");
        out.push_str("    <el-pagination v-model:current-page=\"query.page\" v-model:page-size=\"query.page_size\" :total=\"total\" @change=\"load\" />\n");
        push_line!(
            out,
            "    <{kebab}-dialog v-model=\"dialogVisible\" :row=\"current\" @saved=\"load\" />",
            kebab = names.kebab
        );
        out.push_str("  </div>\n</template>\n\n");

        push_line!(out, "<script setup lang=\"ts\">");
        out.push_str("import { onMounted, reactive, ref } from 'vue'\n");
        push_line!(
            out,
            "import {{ delete{m}, get{m}List, type {m}Info }} from '@/api/{kebab}'\nimport {pascal}Dialog from './modules/{kebab}-dialog.vue'\n",
            m = names.model,
            kebab = names.kebab,
            pascal = names.model
        );
        push_line!(out, "defineOptions({{ name: '{}' }})\n", names.model);
        out.push_str("const query = reactive<Record<string, any>>({ page: 1, page_size: 20 })\n");
        push_line!(out, "const rows = ref<{}Info[]>([])", names.model);
        out.push_str("const total = ref(0)\nconst loading = ref(false)\nconst dialogVisible = ref(false)\n");
        push_line!(out, "const current = ref<{}Info>()\n", names.model);
        push_line!(
            out,
            "async function load() {{\n  loading.value = true\n  try {{\n    const res = await get{m}List(query)\n    rows.value = res.list\n    total.value = res.total\n  }} finally {{\n    loading.value = false\n  }}\n}}\n",
            m = names.model
        );
        push_line!(
            out,
            "function openDialog(row?: {m}Info) {{\n  current.value = row\n  dialogVisible.value = true\n}}\n",
            m = names.model
        );
        push_line!(
            out,
            "async function remove(row: {m}Info) {{\n  await delete{m}(row.id)\n  await load()\n}}\n",
            m = names.model
        );
        out.push_str("onMounted(load)\n</script>");

        Ok(vec![Placement {
            category: "frontend_page",
            target_file: format!("{}/index.vue", view_dir(data)),
            marker: None,
            insertion_point: "new file".to_string(),
            description: format!("{} list page", names.display),
            priority: 1,
        }
        .into_snippet(data, out)])
    }
}

/// Create/edit dialog with one form control per field
#[derive(Debug, Clone, Copy, Default)]
pub struct FrontendFormGenerator;

impl ComponentGenerator for FrontendFormGenerator {
    fn component(&self) -> ComponentType {
        ComponentType::FrontendForm
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::SNIPPETS
    }
}

impl SnippetGenerator for FrontendFormGenerator {
    fn generate_snippets(&self, data: &TemplateData) -> Result<Vec<CodeSnippet>, CoreError> {
        let names = &data.names;

        let mut out = String::new();
        push_line!(
            out,
            "<template>\n  <el-dialog v-model=\"visible\" :title=\"form.id ? 'Edit {d}' : 'Add {d}'\" width=\"640px\">",
            d = names.display
        );
        out.push_str("    <el-form ref=\"formRef\" :model=\"form\" :rules=\"rules\" label-width=\"100px\">\n");
        out.push_str("      <el-row :gutter=\"16\">\n");
        for field in &data.fields {
            let span = if is_wide(field) { 24 } else { 12 };
            push_line!(
                out,
                "        <el-col :span=\"{}\">\n          <el-form-item label=\"{}\" prop=\"{}\">\n            {}\n          </el-form-item>\n        </el-col>",
                span,
                field.label,
                field.ts_name,
                form_control(field)
            );
        }
        out.push_str("      </el-row>\n    </el-form>\n");
        out.push_str("    <template #footer>\n      <el-button @click=\"visible = false\">Cancel</el-button>\n");
        out.push_str("      <el-button type=\"primary\" @click=\"submit\">Save</el-button>\n    </template>\n");
        out.push_str("  </el-dialog>\n</template>\n\n");

        out.push_str("<script setup lang=\"ts\">\n");
        out.push_str("import { computed, reactive, ref, watch } from 'vue'\n");
        out.push_str("import type { FormInstance, FormRules } from 'element-plus'\n");
        push_line!(
            out,
            "import {{ create{m}, update{m}, type {m}Info }} from '@/api/{kebab}'\n",
            m = names.model,
            kebab = names.kebab
        );
        push_line!(
            out,
            "const props = defineProps<{{ modelValue: boolean; row?: {m}Info }}>()",
            m = names.model
        );
        out.push_str("const emit = defineEmits(['update:modelValue', 'saved'])\n");
        out.push_str("const visible = computed({\n  get: () => props.modelValue,\n  set: (v) => emit('update:modelValue', v)\n})\n");
        out.push_str("const formRef = ref<FormInstance>()\n");
        out.push_str("const form = reactive<Record<string, any>>({})\n\n");

        out.push_str("const rules: FormRules = {\n");
        for field in data.fields.iter().filter(|f| f.required) {
            push_line!(
                out,
                "  {}: [{{ required: true, message: '{} is required', trigger: 'blur' }}],",
                field.ts_name, field.label
            );
        }
        out.push_str("}\n\n");

        out.push_str("watch(\n  () => props.row,\n  (row) => {\n    Object.keys(form).forEach((key) => delete form[key])\n    Object.assign(form, row ?? {})\n  },\n  { immediate: true }\n)\n\n");
        push_line!(
            out,
            "async function submit() {{\n  await formRef.value?.validate()\n  if (form.id) {{\n    await update{m}(form.id, form)\n  }} else {{\n    await create{m}(form as any)\n  }}\n  visible.value = false\n  emit('saved')\n}}",
            m = names.model
        );
        out.push_str("</script>");

        Ok(vec![Placement {
            category: "frontend_form",
            target_file: format!("{}/modules/{}-dialog.vue", view_dir(data), names.kebab),
            marker: None,
            insertion_point: "new file".to_string(),
            description: format!("{} create/edit dialog", names.display),
            priority: 2,
        }
        .into_snippet(data, out)])
    }
}

/// Menu route entry and its path alias
#[derive(Debug, Clone, Copy, Default)]
pub struct FrontendRouteGenerator;

impl ComponentGenerator for FrontendRouteGenerator {
    fn component(&self) -> ComponentType {
        ComponentType::FrontendRoute
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::SNIPPETS
    }
}

impl SnippetGenerator for FrontendRouteGenerator {
    fn generate_snippets(&self, data: &TemplateData) -> Result<Vec<CodeSnippet>, CoreError> {
        let names = &data.names;

        let route = format!(
            "  {{\n    path: '/{kebab}',\n    name: '{model}',\n    component: RoutesAlias.{model},\n    meta: {{\n      title: '{display}',\n      keepAlive: true,\n      authList: [\n        {{ title: 'Create', authMark: 'system.{perm}:create' }},\n        {{ title: 'Edit', authMark: 'system.{perm}:update' }},\n        {{ title: 'Delete', authMark: 'system.{perm}:delete' }}\n      ]\n    }}\n  }},",
            kebab = names.kebab,
            model = names.model,
            display = names.display,
            perm = names.permission_prefix,
        );
        let alias = format!("  {} = '/{}/index', // {}", names.model, names.kebab, names.display);

        Ok(vec![
            Placement {
                category: "frontend_route_config",
                target_file: "web/src/router/routes/asyncRoutes.ts".to_string(),
                marker: Some("async-routes"),
                insertion_point: format!("at the end of the asyncRoutes array, for {}", names.display),
                description: "Add the menu route to asyncRoutes".to_string(),
                priority: 1,
            }
            .into_snippet(data, route),
            Placement {
                category: "frontend_route_alias",
                target_file: "web/src/router/routesAlias.ts".to_string(),
                marker: Some("routes-alias"),
                insertion_point: format!("inside the RoutesAlias enum, for {}", names.display),
                description: "Add the view alias to RoutesAlias".to_string(),
                priority: 2,
            }
            .into_snippet(data, alias),
        ])
    }
}

fn ts_comment(field: &FieldContext) -> String {
    if field.clean_comment.is_empty() {
        String::new()
    } else {
        format!(" // {}", field.clean_comment)
    }
}

fn is_wide(field: &FieldContext) -> bool {
    let name = field.source_name.to_lowercase();
    field.go_type.trim_start_matches('*') == "bool"
        || ["description", "remark", "content"].iter().any(|w| name.contains(w))
}

fn form_control(field: &FieldContext) -> String {
    let model = format!("v-model=\"form.{}\"", field.ts_name);
    let name = field.source_name.to_lowercase();
    let base = field.go_type.trim_start_matches('*');

    if field.is_status && base != "bool" {
        return format!(
            "<el-select {}><el-option label=\"Enabled\" :value=\"1\" /><el-option label=\"Disabled\" :value=\"0\" /></el-select>",
            model
        );
    }
    if base == "bool" {
        return format!("<el-switch {} />", model);
    }
    if field.temporal {
        let kind = if name.contains("date") { "date" } else { "datetime" };
        return format!("<el-date-picker {} type=\"{}\" />", model, kind);
    }
    if field.ts_type == "number" {
        return format!("<el-input-number {} />", model);
    }
    if name.contains("password") {
        format!("<el-input {} type=\"password\" show-password />", model)
    } else if is_wide(field) {
        format!("<el-input {} type=\"textarea\" :rows=\"3\" />", model)
    } else {
        format!("<el-input {} />", model)
    }
}
